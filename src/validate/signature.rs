//! Function signature extraction for parameter and return checks.

use lazy_static::lazy_static;
use regex::Regex;

/// Signatures longer than this are truncated.
const MAX_SIGNATURE_LINES: usize = 20;

const PARAM_MODIFIERS: &[&str] = &["public", "private", "protected", "readonly", "override"];

const NON_VALUE_RETURNS: &[&str] = &["void", "Promise<void>", "never", "undefined"];

lazy_static! {
    static ref VARIABLE_NAME: Regex =
        Regex::new(r"^(?:export\s+)?(?:const|let|var)\s+([A-Za-z_$][\w$]*)").unwrap();
    static ref CALLABLE_NAME: Regex =
        Regex::new(r"([A-Za-z_$][\w$]*)\s*(?:<[^(]*>)?\s*\(").unwrap();
    static ref ARROW_SINGLE_PARAM: Regex =
        Regex::new(r"=\s*(?:async\s+)?([A-Za-z_$][\w$]*)\s*=>").unwrap();
    static ref PARAM_NAME: Regex = Regex::new(r"^[A-Za-z_$][\w$]*").unwrap();
}

/// What a declaration header says about its parameters and return type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub name: Option<String>,
    /// Named parameters in order. Destructured parameters are left out.
    pub params: Vec<String>,
    /// Return annotation text, if any.
    pub return_type: Option<String>,
}

impl Signature {
    pub fn is_constructor(&self) -> bool {
        self.name.as_deref() == Some("constructor")
    }

    /// Whether the annotated return type produces a value.
    pub fn returns_value(&self) -> bool {
        match &self.return_type {
            Some(ty) => {
                let compact: String = ty.chars().filter(|c| !c.is_whitespace()).collect();
                !compact.is_empty() && !NON_VALUE_RETURNS.contains(&compact.as_str())
            }
            None => false,
        }
    }
}

/// Parse the signature starting on line `index`, following it across lines
/// until the parameter list closes.
pub fn parse_signature(lines: &[&str], index: usize) -> Signature {
    let mut header = String::new();
    let mut depth = 0i32;
    let mut seen_paren = false;

    for line in lines.iter().skip(index).take(MAX_SIGNATURE_LINES) {
        header.push_str(line.trim());
        header.push(' ');
        for ch in line.chars() {
            match ch {
                '(' => {
                    depth += 1;
                    seen_paren = true;
                }
                ')' => depth -= 1,
                _ => {}
            }
        }
        if !seen_paren || depth <= 0 {
            break;
        }
    }

    parse_header(header.trim())
}

/// Parse a single-line declaration header.
pub fn parse_header(header: &str) -> Signature {
    let name = VARIABLE_NAME
        .captures(header)
        .or_else(|| CALLABLE_NAME.captures(header))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    let Some(open) = header.find('(') else {
        let params = ARROW_SINGLE_PARAM
            .captures(header)
            .and_then(|c| c.get(1))
            .map(|m| vec![m.as_str().to_string()])
            .unwrap_or_default();
        return Signature {
            name,
            params,
            return_type: None,
        };
    };

    let close = matching_paren(header, open).unwrap_or(header.len());
    let inner = &header[open + 1..close];
    let rest = header.get(close + 1..).unwrap_or("");

    Signature {
        name,
        params: split_params(inner),
        return_type: parse_return_type(rest),
    }
}

/// Byte index of the `)` matching the `(` at `open`.
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (i, ch) in text.char_indices().skip_while(|(i, _)| *i < open) {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split a parameter list on top-level commas and extract the names.
pub fn split_params(list: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    let mut prev = ' ';

    for ch in list.chars() {
        match ch {
            '(' | '[' | '{' | '<' => depth += 1,
            '>' if prev == '=' => {}
            ')' | ']' | '}' | '>' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(std::mem::take(&mut current));
                prev = ch;
                continue;
            }
            _ => {}
        }
        current.push(ch);
        prev = ch;
    }
    parts.push(current);

    parts.iter().filter_map(|p| param_name(p)).collect()
}

fn param_name(param: &str) -> Option<String> {
    let mut rest = param.trim();

    loop {
        let stripped = PARAM_MODIFIERS.iter().find_map(|m| {
            rest.strip_prefix(m)
                .filter(|r| r.starts_with(char::is_whitespace))
                .map(str::trim_start)
        });
        match stripped {
            Some(r) => rest = r,
            None => break,
        }
    }

    let rest = rest.trim_start_matches("...");
    let name = PARAM_NAME.find(rest)?.as_str();
    if name == "this" {
        return None;
    }
    Some(name.to_string())
}

/// Return annotation following the parameter list: `: T {`, `: T =>`, `: T;`.
fn parse_return_type(rest: &str) -> Option<String> {
    let annotation = rest.trim_start().strip_prefix(':')?;
    let mut collected = String::new();
    let mut depth = 0i32;
    let mut prev = ' ';

    for ch in annotation.chars() {
        if depth == 0 {
            if ch == '{' && !collected.trim().is_empty() {
                break;
            }
            if ch == '>' && prev == '=' {
                collected.pop();
                break;
            }
            if ch == ';' {
                break;
            }
        }
        match ch {
            '(' | '[' | '{' | '<' => depth += 1,
            '>' if prev == '=' => {}
            ')' | ']' | '}' | '>' => depth -= 1,
            _ => {}
        }
        collected.push(ch);
        prev = ch;
    }

    let ty = collected.trim();
    if ty.is_empty() {
        None
    } else {
        Some(ty.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_signature() {
        let sig = parse_header("exampleMethod(param12: string, param2: number): string {");
        assert_eq!(sig.name.as_deref(), Some("exampleMethod"));
        assert_eq!(sig.params, vec!["param12", "param2"]);
        assert_eq!(sig.return_type.as_deref(), Some("string"));
        assert!(sig.returns_value());
    }

    #[test]
    fn test_void_and_constructor() {
        let sig = parse_header("public async save(item: Item): Promise<void> {");
        assert_eq!(sig.name.as_deref(), Some("save"));
        assert!(!sig.returns_value());

        let sig = parse_header("constructor(private readonly api: Api, public name = 'x') {");
        assert!(sig.is_constructor());
        assert_eq!(sig.params, vec!["api", "name"]);
        assert!(sig.return_type.is_none());
    }

    #[test]
    fn test_complex_parameter_types() {
        let sig = parse_header(
            "function run(cb: (err: Error, v: Map<string, number>) => void, opts?: { a: number, b: string }, ...rest: string[]): Result<T, E> {",
        );
        assert_eq!(sig.params, vec!["cb", "opts", "rest"]);
        assert_eq!(sig.return_type.as_deref(), Some("Result<T, E>"));
    }

    #[test]
    fn test_destructured_parameters_are_skipped() {
        let sig = parse_header("function render({ title, body }: Props, [first]: string[], count = 1) {");
        assert_eq!(sig.params, vec!["count"]);
        assert!(sig.return_type.is_none());
    }

    #[test]
    fn test_arrow_functions() {
        let sig = parse_header("const add = (a: number, b: number): number => a + b;");
        assert_eq!(sig.name.as_deref(), Some("add"));
        assert_eq!(sig.params, vec!["a", "b"]);
        assert_eq!(sig.return_type.as_deref(), Some("number"));

        let sig = parse_header("export const double = x => x * 2;");
        assert_eq!(sig.name.as_deref(), Some("double"));
        assert_eq!(sig.params, vec!["x"]);
    }

    #[test]
    fn test_object_return_type() {
        let sig = parse_header("function point(): { x: number; y: number } {");
        assert_eq!(sig.return_type.as_deref(), Some("{ x: number; y: number }"));
        assert!(sig.returns_value());
    }

    #[test]
    fn test_no_parameters() {
        let sig = parse_header("saludar(): string {");
        assert!(sig.params.is_empty());
        assert!(sig.returns_value());
    }

    #[test]
    fn test_multiline_signature() {
        let lines = vec![
            "  async fetchAll(",
            "    page: number,",
            "    size: number,",
            "  ): Promise<Item[]> {",
            "    return [];",
            "  }",
        ];
        let sig = parse_signature(&lines, 0);
        assert_eq!(sig.params, vec!["page", "size"]);
        assert_eq!(sig.return_type.as_deref(), Some("Promise<Item[]>"));
    }
}
