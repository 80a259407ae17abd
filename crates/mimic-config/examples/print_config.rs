/// Example program to print the loaded configuration
///
/// Run with: cargo run -p mimic-config --example print_config

fn main() {
    // Load configuration from mimic.toml
    let config = mimic_config::MimicConfig::load();

    println!("=== Mimic Configuration ===\n");

    println!("Template Settings:");
    println!("  Directory: {:?}", config.templates.dir);
    println!();

    println!("Annotator Defaults:");
    println!("  Fill Color: {}", config.annotator.fill_color);
    println!("  Empty Color: {}", config.annotator.empty_color);
    println!("  Min: {}", config.annotator.min);
    println!("  Max: {}", config.annotator.max);
    println!();

    println!("Engine Settings:");
    println!("  Change Detection: {}", config.engine.change_detection);
    println!();

    // Try to serialize to TOML for verification
    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
