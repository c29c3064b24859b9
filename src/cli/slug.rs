use crate::services::slug::derive_slug;
use anyhow::Result;

pub fn run(title: &[String]) -> Result<()> {
    let title = title.join(" ");
    let slug = derive_slug(&title);
    if slug.is_empty() {
        anyhow::bail!("'{}' has no characters a slug can be made of", title);
    }
    println!("{}", slug);
    Ok(())
}
