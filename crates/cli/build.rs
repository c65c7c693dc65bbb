use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("linkmark")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Enrich links, pseudocode and embeds in rendered HTML")
        .arg(clap::arg!(<INPUT> "Local HTML file, or '-' for stdin"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (html, json)")
                .value_name("FORMAT")
                .default_value("html")
                .value_parser(["html", "json"]),
        )
        .arg(clap::arg!(--timeout <MS> "Metadata fetch timeout in milliseconds").value_name("MS"))
        .arg(clap::arg!(--"user-agent" <UA> "Custom User-Agent for metadata requests").value_name("UA"))
        .arg(
            clap::arg!(--config <FILE> "Config file")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--offline "Never touch the network"))
        .arg(clap::arg!(--"no-mentions" "Leave bare links untouched"))
        .arg(clap::arg!(--"no-embeds" "Leave single-link paragraphs untouched"))
        .arg(clap::arg!(--"no-algorithms" "Leave pseudocode blocks untouched"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "linkmark", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "linkmark", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "linkmark", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "linkmark", &completions_dir).unwrap();

    println!("cargo:warning=Shell completions generated in: {}", completions_dir.display());
}
