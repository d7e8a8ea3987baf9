//! Generate command implementation.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use reloader_client::{
    config::ReloaderConfig,
    embed::ScriptFlavor,
    generator::{self, ClientError, Endpoint},
    log,
};

use super::GenerateArgs;

/// Render the client script and write it out.
pub fn generate_script(args: &GenerateArgs, config: &ReloaderConfig) -> Result<()> {
    let flavor = resolve_flavor(args, config);
    let endpoints = resolve_endpoints(args, config).map_err(client_error)?;
    let script = generator::generate_from_args(flavor, endpoints).map_err(client_error)?;

    let output = args.output.clone().or_else(|| config.output_path());
    match output {
        Some(path) => write_script(&path, &script)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(script.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// CLI flags win over `[client] minify`.
fn resolve_flavor(args: &GenerateArgs, config: &ReloaderConfig) -> ScriptFlavor {
    if args.readable {
        ScriptFlavor::Readable
    } else if args.minify {
        ScriptFlavor::Minified
    } else {
        ScriptFlavor::from_minify(config.client.minify)
    }
}

/// Positional URLs, or the configured one when none are given.
fn resolve_endpoints(
    args: &GenerateArgs,
    config: &ReloaderConfig,
) -> Result<Vec<Endpoint>, ClientError> {
    if !args.urls.is_empty() {
        return Ok(args.urls.iter().map(|url| Endpoint::from(url.as_str())).collect());
    }
    config.endpoint().map_or(Ok(Vec::new()), |endpoint| Ok(vec![endpoint?]))
}

fn write_script(path: &Path, script: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, script).with_context(|| format!("failed to write {}", path.display()))?;
    log!("generate"; "wrote {} ({} bytes)", path.display(), script.len());
    Ok(())
}

fn client_error(err: ClientError) -> anyhow::Error {
    anyhow!("[{}] {}", err.code(), err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(urls: &[&str]) -> GenerateArgs {
        GenerateArgs {
            urls: urls.iter().map(|s| s.to_string()).collect(),
            readable: false,
            minify: false,
            output: None,
        }
    }

    #[test]
    fn test_flavor_precedence() {
        let mut config = ReloaderConfig::default();
        config.client.minify = false;

        let mut a = args(&[]);
        assert_eq!(resolve_flavor(&a, &config), ScriptFlavor::Readable);
        a.minify = true;
        assert_eq!(resolve_flavor(&a, &config), ScriptFlavor::Minified);
    }

    #[test]
    fn test_positional_urls_win_over_config() {
        let config = ReloaderConfig::from_str("[client]\nurl = \"/config\"\n").unwrap();
        let endpoints = resolve_endpoints(&args(&["/cli"]), &config).unwrap();
        assert_eq!(endpoints, [Endpoint::from("/cli")]);

        let endpoints = resolve_endpoints(&args(&[]), &config).unwrap();
        assert_eq!(endpoints, [Endpoint::from("/config")]);
    }

    #[test]
    fn test_missing_endpoint_reports_code() {
        let config = ReloaderConfig::default();
        let endpoints = resolve_endpoints(&args(&[]), &config).unwrap();
        let err = generator::generate_from_args(ScriptFlavor::Minified, endpoints).unwrap_err();
        assert_eq!(
            client_error(err).to_string(),
            "[ERR_MISSING_ARGS] Expected 1 argument (<string|URL>), but got no arguments."
        );
    }

    #[test]
    fn test_write_script_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public/js/reloader.js");
        write_script(&path, "x").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "x");
    }
}
