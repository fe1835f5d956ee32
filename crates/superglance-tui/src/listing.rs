//! Environment listings

use superglance_core::Document;

use crate::style;

/// Visible width of an environment header line
pub const HEADER_WIDTH: usize = 77;

/// Column the `:` separator is aligned to in parameter lines
pub const PARAM_WIDTH: usize = 21;

/// Sections kept out of the valid-environment hint
pub const HIDDEN_SECTIONS: [&str; 1] = ["log"];

/// Every environment with its parameters, for `--list`.
///
/// Parameters are sorted and shown uppercased; values are printed as written
/// in the config file.
pub fn environment_listing(document: &Document) -> String {
    let mut out = String::new();

    for name in document.sections() {
        let visible = format!("-- {} ", name).chars().count();
        let fill = "-".repeat(HEADER_WIDTH.saturating_sub(visible));
        out.push_str(&format!("-- {} {}\n", style::environment(name), fill));

        let mut items = document.items(name).unwrap_or_default();
        items.sort();
        for (param, value) in items {
            out.push_str(&format!(
                "  {:<width$}: {}\n",
                param.to_uppercase(),
                value,
                width = PARAM_WIDTH
            ));
        }
    }

    out
}

/// Sorted environment names offered when the requested one is unknown
pub fn valid_environments(document: &Document) -> Vec<String> {
    let mut names: Vec<String> = document
        .sections()
        .into_iter()
        .filter(|name| !HIDDEN_SECTIONS.contains(name))
        .map(str::to_string)
        .collect();
    names.sort();
    names
}
