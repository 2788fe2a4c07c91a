use crate::config::Options;
use crate::error::{ExcelifyError, ExcelifyResult};
use crate::excel::TemplateImporter;
use crate::grid::cell_address;
use crate::pipeline::{Excelify, Rendered};
use colored::Colorize;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Load options from an optional YAML file, then apply flag overrides
pub fn load_options(config: Option<&Path>, strict: bool) -> ExcelifyResult<Options> {
    let options = match config {
        Some(path) => Options::from_yaml_file(path)?,
        None => Options::default(),
    };
    let options = if strict { options.strict() } else { options };
    options.validate()?;
    Ok(options)
}

/// Read the JSON data file; `-` reads standard input
fn read_data(data: &Path) -> ExcelifyResult<String> {
    if data.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    fs::read_to_string(data).map_err(|e| {
        ExcelifyError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read data file {}: {}", data.display(), e),
        ))
    })
}

fn read_template(template: &Path) -> ExcelifyResult<Vec<u8>> {
    fs::read(template).map_err(|e| {
        ExcelifyError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read template {}: {}", template.display(), e),
        ))
    })
}

/// Execute the fill command
pub fn fill(
    template: PathBuf,
    data: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
    strict: bool,
    verbose: bool,
) -> ExcelifyResult<()> {
    println!("{}", "📄 Excelify - Filling template".bold().green());
    println!("   Template: {}", template.display());
    println!("   Data:     {}", data.display());
    println!();

    let options = load_options(config.as_deref(), strict)?;
    let json = read_data(&data)?;
    let bytes = read_template(&template)?;

    if verbose {
        println!(
            "{}",
            format!(
                "⚙️  Resolve mode: {:?}, missing arrays: {:?}",
                options.resolve_mode, options.missing_array
            )
            .cyan()
        );
    }

    let excelify = Excelify::with_options(json, bytes, options);
    // Render fully before touching the output file
    let Rendered { workbook, report } = excelify.render()?;
    workbook.save(&output)?;

    println!("{}", "✅ Template filled".bold().green());
    println!(
        "   Array rows:  {} expanded into {} rows ({} passes)",
        report.expansion.templates_expanded,
        report.expansion.rows_created,
        report.expansion.passes
    );
    if report.expansion.rows_removed > 0 {
        println!(
            "   {}",
            format!(
                "{} template rows dropped (empty or missing arrays)",
                report.expansion.rows_removed
            )
            .yellow()
        );
    }
    println!("   Cells filled: {}", report.fill.filled);
    if report.fill.failed > 0 {
        println!(
            "   {}",
            format!(
                "⚠️  {} placeholders could not be resolved (diagnostic written to cell)",
                report.fill.failed
            )
            .yellow()
        );
    }
    println!("   Output: {}", output.display().to_string().bright_blue());

    Ok(())
}

/// Execute the get command: print the value of each path
pub fn get(data: PathBuf, paths: Vec<String>, config: Option<PathBuf>) -> ExcelifyResult<()> {
    let options = load_options(config.as_deref(), false)?;
    let json = read_data(&data)?;
    let excelify = Excelify::with_options(json, Vec::new(), options);

    for path in &paths {
        let value = excelify.read_value(path);
        if paths.len() == 1 {
            println!("{}", value);
        } else {
            println!("{} = {}", path.bright_blue(), value);
        }
    }

    Ok(())
}

/// Execute the inspect command: list the placeholders of the first sheet
pub fn inspect(template: PathBuf, config: Option<PathBuf>) -> ExcelifyResult<()> {
    let options = load_options(config.as_deref(), false)?;
    let workbook = TemplateImporter::from_bytes(&read_template(&template)?)?;
    let grid = workbook
        .first_sheet()
        .ok_or_else(|| ExcelifyError::Template("template has no worksheets".to_string()))?;

    println!("{}", "🔍 Excelify - Template placeholders".bold().green());
    println!("   Template: {}", template.display());
    println!("   Sheet:    {}", grid.name().bright_blue().bold());
    println!();

    let mut scalars = 0;
    let mut arrays = 0;
    for (row_idx, row) in grid.rows().iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let Some(placeholder) = options.delimiters.placeholder(cell) else {
                continue;
            };
            let kind = if placeholder.is_array() {
                arrays += 1;
                "array ".magenta()
            } else {
                scalars += 1;
                "scalar".cyan()
            };
            println!(
                "   {:>8}  {}  {}",
                cell_address(row_idx, col_idx),
                kind,
                placeholder.path()
            );
        }
    }

    println!();
    println!(
        "   {} scalar, {} array placeholders",
        scalars.to_string().bold(),
        arrays.to_string().bold()
    );
    if workbook.len() > 1 {
        println!(
            "   {}",
            format!(
                "{} other sheets are copied unchanged",
                workbook.len() - 1
            )
            .dimmed()
        );
    }

    Ok(())
}
