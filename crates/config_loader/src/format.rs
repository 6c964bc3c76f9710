//! Configuration text format
//!
//! ```text
//! # comment
//! version=1
//! [agents/agent_0]
//! position=0 0 0
//! scene=apartment
//! scene=castle
//! ```
//!
//! - `[a/b]` opens the nested child configuration `a` → `b`
//! - `key=value` stores a scalar; a key repeated inside one section is an
//!   ordered string group
//! - `#` and `;` start comment lines
//!
//! Scalar tokens: `true`/`false`, integers, `1.5f` (float), `1.5` (double),
//! three numbers (vector), four numbers `x y z w` (quaternion). Anything else,
//! or anything wrapped in double quotes, is a string.

use std::collections::HashMap;
use std::fmt::Write as _;

use contracts::{ContractError, Quatf, Result, Vec3f};

use crate::configuration::Configuration;
use crate::value::{ConfigEntry, ConfigValue};

/// Parse text into a configuration.
///
/// Equivalent to replaying `set`/`add_string_to_group` for every line.
pub fn parse(content: &str) -> Result<Configuration> {
    parse_with_raw_sections(content, |_| false)
}

/// Parse text, keeping every value of the sections selected by `is_raw` as
/// the string it was written as (surrounding quotes removed).
pub fn parse_with_raw_sections<F>(content: &str, is_raw: F) -> Result<Configuration>
where
    F: Fn(&[String]) -> bool,
{
    let mut root = Configuration::new();
    let mut section: Vec<String> = Vec::new();
    let mut lines: Vec<(Vec<String>, String, String)> = Vec::new();

    for (index, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        let line_no = index + 1;

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let path = header.strip_suffix(']').ok_or_else(|| {
                ContractError::config_parse(format!("line {line_no}: unterminated section header"))
            })?;
            section = parse_section_path(path, line_no)?;
            root.group_path_mut(section.as_slice());
            continue;
        }

        let (key, value) = line.split_once('=').ok_or_else(|| {
            ContractError::config_parse(format!("line {line_no}: expected 'key=value'"))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ContractError::config_parse(format!(
                "line {line_no}: empty key"
            )));
        }
        lines.push((section.clone(), key.to_string(), value.trim().to_string()));
    }

    let mut occurrences: HashMap<(&[String], &str), usize> = HashMap::new();
    for (path, key, _) in &lines {
        *occurrences.entry((path.as_slice(), key.as_str())).or_default() += 1;
    }

    for (path, key, token) in &lines {
        let target = root.group_path_mut(path.as_slice());
        if occurrences[&(path.as_slice(), key.as_str())] > 1 {
            let element = unquote(token).unwrap_or(token.as_str());
            target.add_string_to_group(key.as_str(), element)?;
        } else if is_raw(path.as_slice()) {
            let raw = unquote(token).unwrap_or(token.as_str());
            target.set_string(key.as_str(), raw);
        } else {
            target.set(key.as_str(), parse_token(token));
        }
    }

    Ok(root)
}

/// Render a configuration as text.
///
/// Scalars are written once, groups once per element in insertion order,
/// root keys first and then child sections depth-first.
///
/// # Errors
/// Keys, section names or values that cannot be represented (line breaks,
/// `=` in keys, `/` or `]` in section names).
pub fn to_string(cfg: &Configuration) -> Result<String> {
    let mut out = String::new();
    write_entries(&mut out, cfg)?;
    write_sections(&mut out, cfg, &mut Vec::new())?;
    Ok(out)
}

fn write_entries(out: &mut String, cfg: &Configuration) -> Result<()> {
    for (key, entry) in cfg.entries() {
        check_key(key)?;
        match entry {
            ConfigEntry::Scalar(value) => {
                let token = format_token(key, value)?;
                let _ = writeln!(out, "{key}={token}");
            }
            ConfigEntry::Group(items) => {
                for item in items {
                    let token = format_string(key, item)?;
                    let _ = writeln!(out, "{key}={token}");
                }
            }
        }
    }
    Ok(())
}

fn write_sections<'a>(
    out: &mut String,
    cfg: &'a Configuration,
    path: &mut Vec<&'a str>,
) -> Result<()> {
    for (name, child) in cfg.groups() {
        if name.is_empty() || name.contains(['/', ']', '\n', '\r']) {
            return Err(ContractError::config_parse(format!(
                "section name '{name}' cannot be written"
            )));
        }
        path.push(name);
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(out, "[{}]", path.join("/"));
        write_entries(out, child)?;
        write_sections(out, child, path)?;
        path.pop();
    }
    Ok(())
}

fn parse_section_path(path: &str, line_no: usize) -> Result<Vec<String>> {
    let segments: Vec<String> = path.split('/').map(|s| s.trim().to_string()).collect();
    if segments.iter().any(String::is_empty) {
        return Err(ContractError::config_parse(format!(
            "line {line_no}: empty section name in '[{path}]'"
        )));
    }
    Ok(segments)
}

fn check_key(key: &str) -> Result<()> {
    let representable = !key.is_empty()
        && key == key.trim()
        && !key.contains(['=', '\n', '\r'])
        && !key.starts_with(['[', '#', ';']);
    if representable {
        Ok(())
    } else {
        Err(ContractError::config_parse(format!(
            "key '{key}' cannot be written"
        )))
    }
}

fn unquote(token: &str) -> Option<&str> {
    token
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
}

/// Infer the scalar kind of a token
pub fn parse_token(token: &str) -> ConfigValue {
    if let Some(inner) = unquote(token) {
        return ConfigValue::String(inner.to_string());
    }
    match token {
        "true" => return ConfigValue::Bool(true),
        "false" => return ConfigValue::Bool(false),
        _ => {}
    }
    if let Ok(v) = token.parse::<i32>() {
        return ConfigValue::Int(v);
    }
    if let Some(v) = token.strip_suffix('f').and_then(parse_number::<f32>) {
        return ConfigValue::Float(v);
    }
    if let Some(v) = parse_number::<f64>(token) {
        return ConfigValue::Double(v);
    }

    let parts: Option<Vec<f32>> = token.split_whitespace().map(parse_number).collect();
    match parts.as_deref() {
        Some(&[x, y, z]) => ConfigValue::Vec3(Vec3f::new(x, y, z)),
        Some(&[x, y, z, w]) => ConfigValue::Quat(Quatf::new(w, x, y, z)),
        _ => ConfigValue::String(token.to_string()),
    }
}

// Plain decimal notation only, so words like `inf` stay strings.
fn parse_number<T: std::str::FromStr>(token: &str) -> Option<T> {
    let numeric = token.bytes().any(|b| b.is_ascii_digit())
        && token
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if numeric {
        token.parse().ok()
    } else {
        None
    }
}

fn format_token(key: &str, value: &ConfigValue) -> Result<String> {
    let token = match value {
        ConfigValue::Bool(v) => v.to_string(),
        ConfigValue::Int(v) => v.to_string(),
        ConfigValue::Float(v) => format!("{}f", format_f32(key, *v)?),
        ConfigValue::Double(v) => {
            if !v.is_finite() {
                return Err(non_finite(key));
            }
            format!("{v:?}")
        }
        ConfigValue::String(v) => format_string(key, v)?,
        ConfigValue::Vec3(v) => format!(
            "{} {} {}",
            format_f32(key, v.x)?,
            format_f32(key, v.y)?,
            format_f32(key, v.z)?
        ),
        ConfigValue::Quat(q) => format!(
            "{} {} {} {}",
            format_f32(key, q.i)?,
            format_f32(key, q.j)?,
            format_f32(key, q.k)?,
            format_f32(key, q.w)?
        ),
    };
    Ok(token)
}

fn format_f32(key: &str, v: f32) -> Result<String> {
    if v.is_finite() {
        Ok(format!("{v:?}"))
    } else {
        Err(non_finite(key))
    }
}

fn non_finite(key: &str) -> ContractError {
    ContractError::config_parse(format!("value of '{key}' is not finite"))
}

// Quote strings that would otherwise come back as another kind.
fn format_string(key: &str, value: &str) -> Result<String> {
    if value.contains(['\n', '\r']) {
        return Err(ContractError::config_parse(format!(
            "value of '{key}' spans several lines"
        )));
    }
    let reparsed = parse_token(value);
    if value != value.trim() || reparsed != ConfigValue::String(value.to_string()) {
        Ok(format!("\"{value}\""))
    } else {
        Ok(value.to_string())
    }
}
