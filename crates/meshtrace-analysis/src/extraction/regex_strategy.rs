//! Regex-based extraction for Spring controllers and RestTemplate clients.
//!
//! Patterns are compiled once per strategy instance. Headers whose name or
//! return-type token is a Java keyword (`if (..) {`, `new Foo() {`) are not
//! methods and never enter the results. Declarations are searched in a copy
//! of the source with comments blanked out, so byte offsets stay valid
//! against the original text.

use std::path::Path;

use meshtrace_core::constants::UNKNOWN;
use meshtrace_core::errors::ExtractionError;
use meshtrace_core::types::collections::SmallVec8;
use meshtrace_core::HttpVerb;
use regex::Regex;

use super::{EndpointDeclaration, ExtractionStrategy, MethodSpan, RawCallSite};

const PACKAGE: &str = r"package\s+([\w.]+)\s*;";
const TYPE_DECLARATION: &str = r"\b(?:class|interface|enum)\s+\w+";
const MAPPING_ANNOTATION: &str = r"@(Get|Post|Put|Delete|Patch|Request)Mapping\b(?:\s*\(([^)]*)\))?";
const REQUEST_METHOD: &str = r"RequestMethod\.(\w+)";
/// Positional first argument, or an explicit `value =` / `path =` element.
const PATH_ARGUMENT: &str = r#"(?:^\s*|\b(?:value|path)\s*=\s*)\{?\s*"([^"]*)""#;
const METHOD_HEADER: &str = r"(?:public|protected|private|static|\s) +([\w\[\]?.]+(?:<[\w\s,<>\[\]?.]*>)?(?:\[\])*)\s+(\w+) *\([^)]*\) *(?:throws [^{]+)?\{";
const CALL_IDENTIFIER: &str = r"(\w+)\(";
const SERVICE_URL_BINDING: &str = r#"(\w+)\s*=\s*getServiceUrl\("([^"]+)"\)"#;
const REST_TEMPLATE_CALL: &str = r"restTemplate\.(exchange|getForObject|getForEntity|postForObject|postForEntity|put|delete|patchForObject)\(\s*([^,;]+)(?:,\s*([^,;]+))?";
const HTTP_METHOD_ARG: &str = r"HttpMethod\.(\w+)";
const DIRECT_SERVICE_URL: &str = r#"getServiceUrl\("([^"]+)"\)"#;
const CONCATENATED_LITERAL: &str = r#"\+\s*"([^"]+)""#;
const NON_EMPTY_LITERAL: &str = r#""([^"]+)""#;

/// Tokens that can sit in the name slot of a header match but never name a method.
const NAME_KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "synchronized", "try", "do", "else", "return",
    "new", "throw", "super", "this",
];

/// Tokens that can sit in the type slot of a header match but never start a declaration.
const TYPE_KEYWORDS: &[&str] = &["new", "return", "else", "throw", "case", "yield"];

/// A non-keyword method header located in a source text.
#[derive(Debug, Clone)]
struct Header {
    name: String,
    start: usize,
    end: usize,
}

/// Spring `@XMapping` + RestTemplate extraction strategy.
pub struct SpringRegexStrategy {
    package: Regex,
    type_declaration: Regex,
    mapping_annotation: Regex,
    request_method: Regex,
    path_argument: Regex,
    method_header: Regex,
    call_identifier: Regex,
    service_url_binding: Regex,
    rest_template_call: Regex,
    http_method_arg: Regex,
    direct_service_url: Regex,
    concatenated_literal: Regex,
    non_empty_literal: Regex,
}

/// Copy of `source` with comments, and string-literal contents when
/// `strings` is set, replaced by spaces. Newlines and byte offsets are kept.
fn blank_out(source: &str, strings: bool) -> String {
    let bytes = source.as_bytes();
    let mut out = bytes.to_vec();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    out[i] = b' ';
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = source[i + 2..].find("*/").map_or(bytes.len(), |p| i + 2 + p + 2);
                for b in out[i..end].iter_mut().filter(|b| **b != b'\n') {
                    *b = b' ';
                }
                i = end;
            }
            quote @ (b'"' | b'\'') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote && bytes[i] != b'\n' {
                    let end = if bytes[i] == b'\\' { (i + 2).min(bytes.len()) } else { i + 1 };
                    if strings {
                        out[i..end].fill(b' ');
                    }
                    i = end;
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    String::from_utf8(out).unwrap_or_else(|_| source.to_string())
}

fn compile(name: &str, pattern: &str) -> Result<Regex, ExtractionError> {
    Regex::new(pattern).map_err(|e| ExtractionError::InvalidPattern {
        name: name.to_string(),
        message: e.to_string(),
    })
}

impl SpringRegexStrategy {
    pub fn new() -> Result<Self, ExtractionError> {
        Ok(Self {
            package: compile("package", PACKAGE)?,
            type_declaration: compile("type_declaration", TYPE_DECLARATION)?,
            mapping_annotation: compile("mapping_annotation", MAPPING_ANNOTATION)?,
            request_method: compile("request_method", REQUEST_METHOD)?,
            path_argument: compile("path_argument", PATH_ARGUMENT)?,
            method_header: compile("method_header", METHOD_HEADER)?,
            call_identifier: compile("call_identifier", CALL_IDENTIFIER)?,
            service_url_binding: compile("service_url_binding", SERVICE_URL_BINDING)?,
            rest_template_call: compile("rest_template_call", REST_TEMPLATE_CALL)?,
            http_method_arg: compile("http_method_arg", HTTP_METHOD_ARG)?,
            direct_service_url: compile("direct_service_url", DIRECT_SERVICE_URL)?,
            concatenated_literal: compile("concatenated_literal", CONCATENATED_LITERAL)?,
            non_empty_literal: compile("non_empty_literal", NON_EMPTY_LITERAL)?,
        })
    }

    /// Method headers of `source`, which should already have comments blanked.
    fn headers(&self, source: &str) -> Vec<Header> {
        self.method_header
            .captures_iter(source)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let ty = caps.get(1)?.as_str();
                let name = caps.get(2)?.as_str();
                if TYPE_KEYWORDS.contains(&ty) || NAME_KEYWORDS.contains(&name) {
                    return None;
                }
                Some(Header {
                    name: name.to_string(),
                    start: whole.start(),
                    end: whole.end(),
                })
            })
            .collect()
    }

    /// `package.Unit` for a file, or just `Unit` without a package statement.
    fn qualified_unit(&self, source: &str, file_name: &str) -> String {
        let unit = Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file_name);
        match self.package.captures(source).and_then(|c| c.get(1)) {
            Some(pkg) => format!("{}.{}", pkg.as_str(), unit),
            None => unit.to_string(),
        }
    }

    /// Path fragment of a mapping annotation. Attribute-only arguments such
    /// as `consumes = ".."` leave it empty.
    fn path_fragment(&self, args: Option<&str>) -> String {
        args.and_then(|a| self.path_argument.captures(a))
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim_matches('/').to_string())
            .unwrap_or_default()
    }

    fn mapping_verb(&self, kind: &str, args: Option<&str>) -> Result<HttpVerb, String> {
        match kind {
            "Get" => Ok(HttpVerb::Get),
            "Post" => Ok(HttpVerb::Post),
            "Put" => Ok(HttpVerb::Put),
            "Delete" => Ok(HttpVerb::Delete),
            "Patch" => Ok(HttpVerb::Patch),
            _ => match args
                .and_then(|a| self.request_method.captures(a))
                .and_then(|c| c.get(1))
            {
                Some(m) => m.as_str().parse(),
                None => Ok(HttpVerb::Get),
            },
        }
    }

    fn client_verb(&self, operation: &str, second_arg: &str) -> Result<HttpVerb, String> {
        match operation {
            "postForObject" | "postForEntity" => Ok(HttpVerb::Post),
            "put" => Ok(HttpVerb::Put),
            "delete" => Ok(HttpVerb::Delete),
            "patchForObject" => Ok(HttpVerb::Patch),
            "exchange" => match self
                .http_method_arg
                .captures(second_arg)
                .and_then(|c| c.get(1))
            {
                Some(m) => m.as_str().parse(),
                None => Ok(HttpVerb::Get),
            },
            _ => Ok(HttpVerb::Get),
        }
    }

    /// Resolve `(target_service, endpoint)` from a URL expression. A URL
    /// variable bound via `getServiceUrl` is tried first, then an inline call.
    fn resolve_target(
        &self,
        url_expr: &str,
        bindings: &[(String, String)],
    ) -> Option<(String, String)> {
        if let Some((_, service)) = bindings.iter().find(|(var, _)| url_expr.starts_with(var.as_str())) {
            let endpoint = self
                .non_empty_literal
                .captures(url_expr)
                .and_then(|c| c.get(1))
                .map_or_else(|| UNKNOWN.to_string(), |m| m.as_str().to_string());
            return Some((service.clone(), endpoint));
        }

        let service = self.direct_service_url.captures(url_expr)?.get(1)?.as_str().to_string();
        let endpoint = self
            .concatenated_literal
            .captures(url_expr)
            .and_then(|c| c.get(1))
            .map_or_else(|| UNKNOWN.to_string(), |m| m.as_str().to_string());
        Some((service, endpoint))
    }
}

impl ExtractionStrategy for SpringRegexStrategy {
    fn name(&self) -> &str {
        "spring-regex"
    }

    fn extract_endpoints(&self, source: &str, file_name: &str) -> Vec<EndpointDeclaration> {
        let code = blank_out(source, false);
        let declaring_type = self.qualified_unit(&code, file_name);
        let headers = self.headers(&code);

        // Class-level base path: the first @RequestMapping ahead of the type declaration.
        let type_start = self
            .type_declaration
            .find(&blank_out(&code, true))
            .map(|m| m.start());
        let class_mapping = type_start.and_then(|limit| {
            self.mapping_annotation
                .captures_iter(&code[..limit])
                .find(|c| c.get(1).is_some_and(|k| k.as_str() == "Request"))
        });
        let base_path = class_mapping
            .as_ref()
            .map(|c| self.path_fragment(c.get(2).map(|m| m.as_str())))
            .unwrap_or_default();
        let class_mapping_start = class_mapping.as_ref().and_then(|c| c.get(0)).map(|m| m.start());

        let mut declarations = Vec::new();
        for caps in self.mapping_annotation.captures_iter(&code) {
            let Some(whole) = caps.get(0) else { continue };
            if Some(whole.start()) == class_mapping_start {
                continue;
            }
            let kind = caps.get(1).map_or("", |m| m.as_str());
            let args = caps.get(2).map(|m| m.as_str());

            let verb = match self.mapping_verb(kind, args) {
                Ok(v) => v,
                Err(message) => {
                    tracing::debug!(file = file_name, %message, "dropping mapping with unsupported verb");
                    continue;
                }
            };

            let Some(header) = headers.iter().find(|h| h.start >= whole.end()) else {
                tracing::debug!(file = file_name, "mapping annotation without a following method");
                continue;
            };

            let method_path = self.path_fragment(args);
            let path = [base_path.as_str(), method_path.as_str()]
                .iter()
                .filter(|s| !s.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join("/");

            declarations.push(EndpointDeclaration {
                declaring_type: declaring_type.clone(),
                method_name: header.name.clone(),
                path,
                verb,
            });
        }
        declarations
    }

    fn extract_methods_and_bodies(&self, source: &str) -> Vec<MethodSpan> {
        let headers = self.headers(&blank_out(source, false));
        headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let end = headers.get(i + 1).map_or(source.len(), |next| next.start);
                MethodSpan {
                    name: h.name.clone(),
                    body: h.end..end.max(h.end),
                }
            })
            .collect()
    }

    fn extract_call_identifiers(&self, body: &str) -> Vec<String> {
        self.call_identifier
            .captures_iter(body)
            .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }

    fn extract_call_sites(&self, source: &str, file_name: &str) -> Vec<RawCallSite> {
        let unit = self.qualified_unit(source, file_name);
        let headers = self.headers(&blank_out(source, false));

        // Later bindings of the same variable overwrite earlier ones in place.
        let mut bindings: SmallVec8<(String, String)> = SmallVec8::new();
        for caps in self.service_url_binding.captures_iter(source) {
            let (Some(var), Some(service)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            match bindings.iter_mut().find(|(v, _)| v == var.as_str()) {
                Some(slot) => slot.1 = service.as_str().to_string(),
                None => bindings.push((var.as_str().to_string(), service.as_str().to_string())),
            }
        }

        let mut sites = Vec::new();
        for caps in self.rest_template_call.captures_iter(source) {
            let Some(whole) = caps.get(0) else { continue };
            let operation = caps.get(1).map_or("", |m| m.as_str());
            let url_expr = caps.get(2).map_or("", |m| m.as_str().trim());
            let second_arg = caps.get(3).map_or("", |m| m.as_str().trim());

            let verb = match self.client_verb(operation, second_arg) {
                Ok(v) => v,
                Err(message) => {
                    tracing::debug!(file = file_name, %message, "dropping call site with unsupported verb");
                    continue;
                }
            };

            let Some((target_service, endpoint)) = self.resolve_target(url_expr, &bindings) else {
                tracing::trace!(file = file_name, url = url_expr, "unresolved call target");
                continue;
            };

            let method = headers
                .iter()
                .rev()
                .find(|h| h.start < whole.start())
                .map_or(UNKNOWN, |h| h.name.as_str());

            sites.push(RawCallSite {
                source_method: format!("{unit}.{method}"),
                target_service,
                endpoint,
                verb,
            });
        }
        sites
    }
}
