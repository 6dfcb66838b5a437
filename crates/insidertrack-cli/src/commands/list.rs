use crate::config::CliConfig;

pub fn execute(config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.companies.is_empty() {
        println!("No companies configured");
        return Ok(());
    }
    for company in &config.companies {
        match &company.url {
            Some(url) => println!("{}\t{}\t{}", company.slug, company.name, url),
            None => println!("{}\t{}", company.slug, company.name),
        }
    }
    Ok(())
}
