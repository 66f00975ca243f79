use colored::Colorize;

const LOGO: &str = r"
  _                            _
 (_)_ __ ___  _ __  _ __ _____   __
 | | '_ ` _ \| '_ \| '__/ _ \ \ / /
 | | | | | | | |_) | | | (_) \ V /
 |_|_| |_| |_| .__/|_|  \___/ \_/
             |_|
";

pub fn print_banner_with_version() {
    println!("{}", LOGO.truecolor(0x17, 0xA1, 0xC7).bold());
    println!(
        "  {} {}",
        "improv".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).truecolor(0xA5, 0xCD, 0x39)
    );
    println!("  {}", env!("CARGO_PKG_DESCRIPTION").dimmed());
}
