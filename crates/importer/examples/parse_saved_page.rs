use importer::sources::ffvb::PageParser;

/// Parses a competition page saved to disk, e.g. with
/// `curl -o page.html '<competition url>'`.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let file = args.next().ok_or("usage: parse_saved_page <file.html> <source url>")?;
    let url = args.next().ok_or("usage: parse_saved_page <file.html> <source url>")?;

    let html = std::fs::read_to_string(&file)?;

    match PageParser::default().parse(&html, &url)? {
        Some(parsed) => println!("{}", serde_json::to_string_pretty(&parsed)?),
        None => println!("No competition found in {}", file),
    }

    Ok(())
}
