//! Host-side helper: builds and serves the site, and inspects exported
//! keyframe documents without a browser.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::{Path, PathBuf};
    use std::process::{Command, Stdio};

    use anyhow::{bail, Context, Result};
    use clap::{Parser, Subcommand};
    use scroll_shaders::editor::ExportDocument;
    use scroll_shaders::params::{ParamId, ParamKind, ShaderParams};

    #[derive(Parser)]
    #[command(name = "viz")]
    #[command(about = "Scroll shader build and inspection tasks")]
    struct Cli {
        #[command(subcommand)]
        command: Commands,
    }

    #[derive(Subcommand)]
    enum Commands {
        /// Build the wasm package into static/pkg and serve static/
        Serve {
            #[arg(long, default_value_t = 8000)]
            port: u16,
        },
        /// Print the interpolated configuration of an exported keyframe document
        Sample {
            /// JSON produced by the editor's export
            file: PathBuf,
            /// Scroll progress, 0.0 ..= 1.0
            progress: f32,
        },
        /// Print every shader parameter with its kind, range and default
        Params,
    }

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let cli = Cli::parse();

        match cli.command {
            Commands::Serve { port } => serve(port),
            Commands::Sample { file, progress } => sample(&file, progress),
            Commands::Params => params(),
        }
    }

    fn serve(port: u16) -> Result<()> {
        log::info!("building wasm package");
        let status = Command::new("wasm-pack")
            .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
            .status()
            .context("wasm-pack not found in PATH (https://rustwasm.github.io/wasm-pack/)")?;
        if !status.success() {
            bail!("wasm-pack build failed");
        }

        log::info!("serving static/ at http://127.0.0.1:{port}");
        let status = Command::new("python3")
            .args(["-m", "http.server", &port.to_string(), "--directory", "static"])
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .status()
            .context("failed to start http server")?;
        if !status.success() {
            bail!("http server exited with {status}");
        }
        Ok(())
    }

    fn sample(file: &Path, progress: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&progress) {
            bail!("progress must be within 0.0 ..= 1.0, got {progress}");
        }
        let json = std::fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        let doc = ExportDocument::from_json(&json)
            .with_context(|| format!("failed to parse {}", file.display()))?;
        log::debug!("{} keyframes loaded", doc.keyframes.len());

        let config = doc.keyframe_set().sample(progress, &doc.shader_config);
        println!("{}", serde_json::to_string_pretty(&config)?);
        Ok(())
    }

    fn params() -> Result<()> {
        let defaults = ShaderParams::default();
        println!("{:<16} {:<8} {:<22} default", "key", "kind", "range");
        for id in ParamId::ALL {
            let (kind, range) = match id.kind() {
                ParamKind::Number(r) => ("number", format!("{} ..= {} / {}", r.min, r.max, r.step)),
                ParamKind::Color => ("color", String::new()),
                ParamKind::Choice => ("choice", String::new()),
            };
            println!("{:<16} {:<8} {:<22} {}", id.key(), kind, range, defaults.get(id));
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    cli::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
