use colored::Colorize;
use vqa_infrastructure::VqaPaths;

pub fn show(paths: &VqaPaths) {
    println!("{}", "📁 VQA paths".bold());
    print_path("root", &paths.root().display().to_string(), paths.root().exists());
    let config = paths.config_file();
    print_path("config", &config.display().to_string(), config.exists());
    let state = paths.state_file();
    print_path("state", &state.display().to_string(), state.exists());
}

fn print_path(label: &str, path: &str, exists: bool) {
    let marker = if exists { "✓".green() } else { "-".dimmed() };
    println!("  {} {:<7} {}", marker, label, path);
}
