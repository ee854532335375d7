use anyhow::Context;
use scriptgen_core::definition::IntegrationDefinition;
use scriptgen_core::generate::Generator;
use scriptgen_core::io;
use scriptgen_core::template::ScriptTemplate;
use std::path::Path;

pub fn run(
    definition_path: &Path,
    out_dir: &Path,
    template: &str,
    json: bool,
) -> anyhow::Result<()> {
    let template: ScriptTemplate = template.parse()?;

    let definition = IntegrationDefinition::load(definition_path)
        .with_context(|| format!("failed to load {}", definition_path.display()))?;

    io::ensure_dir(out_dir).with_context(|| format!("failed to create {}", out_dir.display()))?;

    let written = Generator::new(out_dir)
        .with_template(template)
        .generate(&definition)
        .context("script generation failed")?;

    if json {
        let paths: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
        println!("{}", serde_json::to_string_pretty(&paths)?);
        return Ok(());
    }

    for path in &written {
        println!("  wrote: {}", path.display());
    }
    println!(
        "Generated {} script(s) from {}",
        written.len(),
        definition_path.display()
    );
    Ok(())
}
