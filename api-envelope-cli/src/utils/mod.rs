use colored::Colorize;

/// Section header
pub fn section(title: &str) {
    println!("\n{}", title.bold().underline());
}
