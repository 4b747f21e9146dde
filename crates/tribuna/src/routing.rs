use crate::route::RouteKind;

/// A `[name]` segment found in a route pattern, as a byte span into the
/// pattern string (`start` points at the `[`, `end` one past the `]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDef {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

pub fn route_parameters(pattern: &str) -> Vec<ParameterDef> {
    let mut params = Vec::new();
    let mut cursor = 0;

    while let Some(open) = pattern[cursor..].find('[') {
        let start = cursor + open;
        let Some(close) = pattern[start + 1..].find(']') else {
            // Unclosed bracket, the rest of the pattern is literal.
            break;
        };
        let end = start + 1 + close + 1;

        params.push(ParameterDef {
            name: pattern[start + 1..end - 1].to_string(),
            start,
            end,
        });

        cursor = end;
    }

    params
}

pub fn route_kind(pattern: &str) -> RouteKind {
    if route_parameters(pattern).is_empty() {
        RouteKind::Static
    } else {
        RouteKind::Dynamic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_no_parameters_in_static_pattern() {
        assert!(route_parameters("/").is_empty());
        assert!(route_parameters("/debates").is_empty());
    }

    #[test]
    fn finds_single_parameter() {
        let params = route_parameters("/debate/[slug]");
        assert_eq!(
            params,
            vec![ParameterDef {
                name: "slug".to_string(),
                start: 8,
                end: 14,
            }]
        );
    }

    #[test]
    fn finds_multiple_parameters() {
        let params = route_parameters("/[year]/debate/[slug]");
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "year");
        assert_eq!(params[1].name, "slug");
        assert_eq!(&"/[year]/debate/[slug]"[params[1].start..params[1].end], "[slug]");
    }

    #[test]
    fn unclosed_bracket_is_literal() {
        assert!(route_parameters("/debate/[slug").is_empty());

        let params = route_parameters("/[year]/debate/[slug");
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "year");
    }

    #[test]
    fn classifies_route_kind() {
        assert_eq!(route_kind("/"), RouteKind::Static);
        assert_eq!(route_kind("/debate/[slug]"), RouteKind::Dynamic);
    }
}
