//! Pattern compiler: turns one route pattern string into a [`CompiledRoute`].

use super::error::PatternError;
use super::types::{
    CompiledRoute, LiteralSegment, OptionSegment, ParameterSegment, RouteDefinition, Segment,
    END_OF_OPTIONS,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::iter::Peekable;
use std::sync::Arc;

#[allow(clippy::expect_used)]
static PARAMETER_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\{(?P<catch_all>\*)?(?P<name>[A-Za-z_][A-Za-z0-9_-]*)(?::(?P<ty>[A-Za-z_][A-Za-z0-9_]*))?(?P<optional>\?)?\}(?P<repeated>\*)?$",
    )
    .expect("valid parameter regex")
});

#[allow(clippy::expect_used)]
static LONG_OPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^--[A-Za-z0-9][A-Za-z0-9_-]*$").expect("valid long option regex"));

#[allow(clippy::expect_used)]
static SHORT_OPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-[A-Za-z0-9]$").expect("valid short option regex"));

/// Compile a bare pattern bound to `handler_name`.
///
/// ```
/// use argvrouter::pattern::compile_pattern;
///
/// let route = compile_pattern("deploy {env} --force", "deploy").unwrap();
/// assert_eq!(route.segments.len(), 3);
/// assert!(!route.has_catch_all);
/// ```
pub fn compile_pattern(pattern: &str, handler_name: &str) -> Result<CompiledRoute, PatternError> {
    compile_route(&RouteDefinition::new(pattern, handler_name))
}

/// Compile a route definition, including its group prefix.
pub fn compile_route(definition: &RouteDefinition) -> Result<CompiledRoute, PatternError> {
    let mut compiler = PatternCompiler::default();

    let group_prefix = definition
        .group_prefix
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());
    if let Some(prefix) = group_prefix {
        compiler.push_prefix(prefix)?;
    }

    let mut tokens = definition.pattern.split_whitespace().peekable();
    while let Some(token) = tokens.next() {
        compiler.push_token(token, &mut tokens)?;
    }

    Ok(compiler.finish(definition, group_prefix))
}

/// Parameter placeholder as written, before it becomes a segment.
struct Placeholder<'p> {
    name: &'p str,
    type_constraint: Option<&'p str>,
    is_optional: bool,
    is_catch_all: bool,
    is_repeated: bool,
}

fn parse_placeholder(token: &str) -> Result<Placeholder<'_>, PatternError> {
    let Some(caps) = PARAMETER_TOKEN.captures(token) else {
        return Err(PatternError::InvalidToken {
            token: token.to_string(),
            reason: "expected {name}, {name:type}, {name?} or {*name}",
        });
    };
    let Some(name) = caps.name("name") else {
        return Err(PatternError::InvalidToken {
            token: token.to_string(),
            reason: "missing parameter name",
        });
    };

    let placeholder = Placeholder {
        name: name.as_str(),
        type_constraint: caps.name("ty").map(|m| m.as_str()),
        is_optional: caps.name("optional").is_some(),
        is_catch_all: caps.name("catch_all").is_some(),
        is_repeated: caps.name("repeated").is_some(),
    };

    if placeholder.is_catch_all && placeholder.is_optional {
        return Err(PatternError::InvalidToken {
            token: token.to_string(),
            reason: "a catch-all parameter cannot be marked optional",
        });
    }
    Ok(placeholder)
}

#[derive(Default)]
struct PatternCompiler<'p> {
    segments: Vec<Segment>,
    keys: HashSet<&'p str>,
    long_forms: HashSet<&'p str>,
    short_forms: HashSet<&'p str>,
    first_optional: Option<&'p str>,
    catch_all: Option<&'p str>,
    seen_end_of_options: bool,
}

impl<'p> PatternCompiler<'p> {
    fn push_prefix(&mut self, prefix: &'p str) -> Result<(), PatternError> {
        for token in prefix.split_whitespace() {
            let is_literal = token != END_OF_OPTIONS
                && !token.contains(['{', '}'])
                && !(token.starts_with('-') && token.len() > 1);
            if !is_literal {
                return Err(PatternError::InvalidGroupPrefix {
                    prefix: prefix.to_string(),
                });
            }
            self.segments.push(Segment::Literal(LiteralSegment {
                value: token.to_string(),
            }));
        }
        Ok(())
    }

    fn push_token<I>(&mut self, token: &'p str, rest: &mut Peekable<I>) -> Result<(), PatternError>
    where
        I: Iterator<Item = &'p str>,
    {
        if token == END_OF_OPTIONS {
            return self.push_end_of_options();
        }

        if token.starts_with('{') {
            let placeholder = parse_placeholder(token)?;
            if placeholder.is_repeated {
                return Err(PatternError::InvalidToken {
                    token: token.to_string(),
                    reason: "the '*' repeat marker is only valid after an option value",
                });
            }
            return self.push_parameter(placeholder);
        }

        if token.starts_with('-') && token.len() > 1 {
            let value = match rest.peek() {
                Some(&next) if next.starts_with('{') => {
                    let placeholder = parse_placeholder(next)?;
                    if placeholder.is_catch_all {
                        return Err(PatternError::InvalidToken {
                            token: next.to_string(),
                            reason: "an option value cannot be a catch-all",
                        });
                    }
                    rest.next();
                    Some(placeholder)
                }
                _ => None,
            };
            return self.push_option(token, value);
        }

        if token.contains(['{', '}']) {
            return Err(PatternError::InvalidToken {
                token: token.to_string(),
                reason: "braces are only allowed around a whole parameter",
            });
        }
        self.push_literal(token)
    }

    fn claim_key(&mut self, key: &'p str) -> Result<(), PatternError> {
        if self.keys.insert(key) {
            Ok(())
        } else {
            Err(PatternError::DuplicateParameter {
                name: key.to_string(),
            })
        }
    }

    fn ensure_no_catch_all(&self) -> Result<(), PatternError> {
        match self.catch_all {
            Some(name) => Err(PatternError::CatchAllNotLast {
                name: name.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn ensure_no_optional_before(&self, literal: &str) -> Result<(), PatternError> {
        match self.first_optional {
            Some(optional) => Err(PatternError::LiteralAfterOptional {
                optional: optional.to_string(),
                literal: literal.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn push_literal(&mut self, token: &'p str) -> Result<(), PatternError> {
        self.ensure_no_catch_all()?;
        self.ensure_no_optional_before(token)?;
        self.segments.push(Segment::Literal(LiteralSegment {
            value: token.to_string(),
        }));
        Ok(())
    }

    fn push_end_of_options(&mut self) -> Result<(), PatternError> {
        if self.seen_end_of_options {
            return Err(PatternError::DuplicateEndOfOptions);
        }
        self.ensure_no_catch_all()?;
        self.ensure_no_optional_before(END_OF_OPTIONS)?;
        self.seen_end_of_options = true;
        self.segments.push(Segment::Literal(LiteralSegment {
            value: END_OF_OPTIONS.to_string(),
        }));
        Ok(())
    }

    fn push_parameter(&mut self, placeholder: Placeholder<'p>) -> Result<(), PatternError> {
        self.ensure_no_catch_all()?;

        if placeholder.is_catch_all {
            if let Some(optional) = self.first_optional {
                return Err(PatternError::CatchAllWithOptional {
                    catch_all: placeholder.name.to_string(),
                    optional: optional.to_string(),
                });
            }
            self.catch_all = Some(placeholder.name);
        } else if placeholder.is_optional {
            self.first_optional.get_or_insert(placeholder.name);
        } else if let Some(optional) = self.first_optional {
            return Err(PatternError::OptionalBeforeRequired {
                optional: optional.to_string(),
                required: placeholder.name.to_string(),
            });
        }

        self.claim_key(placeholder.name)?;
        self.segments.push(Segment::Parameter(ParameterSegment {
            name: Arc::from(placeholder.name),
            type_constraint: placeholder.type_constraint.map(str::to_string),
            is_optional: placeholder.is_optional,
            is_catch_all: placeholder.is_catch_all,
        }));
        Ok(())
    }

    fn push_option(
        &mut self,
        token: &'p str,
        value: Option<Placeholder<'p>>,
    ) -> Result<(), PatternError> {
        if self.seen_end_of_options {
            return Err(PatternError::OptionAfterEndOfOptions {
                option: token.to_string(),
            });
        }

        let (spelling, modifier) = match token.char_indices().last() {
            Some((idx, c @ ('?' | '*'))) => (&token[..idx], Some(c)),
            _ => (token, None),
        };

        let mut long_form = None;
        let mut short_form = None;
        for part in spelling.split(',') {
            let slot = if LONG_OPTION.is_match(part) {
                &mut long_form
            } else if SHORT_OPTION.is_match(part) {
                &mut short_form
            } else {
                return Err(PatternError::InvalidToken {
                    token: token.to_string(),
                    reason: "expected --long, -s or --long,-s",
                });
            };
            if slot.replace(part).is_some() {
                return Err(PatternError::InvalidToken {
                    token: token.to_string(),
                    reason: "an option takes at most one long and one short form",
                });
            }
        }

        if let Some(long) = long_form {
            if !self.long_forms.insert(long) {
                return Err(PatternError::DuplicateOption {
                    option: long.to_string(),
                });
            }
        }
        if let Some(short) = short_form {
            if !self.short_forms.insert(short) {
                return Err(PatternError::DuplicateShortAlias {
                    alias: short.to_string(),
                });
            }
        }

        let key = value
            .as_ref()
            .map(|v| v.name)
            .or_else(|| long_form.map(|l| &l[2..]))
            .or_else(|| short_form.map(|s| &s[1..]));
        let Some(key) = key else {
            return Err(PatternError::InvalidToken {
                token: token.to_string(),
                reason: "option has no name",
            });
        };
        self.claim_key(key)?;

        let is_repeated = modifier == Some('*') || value.as_ref().is_some_and(|v| v.is_repeated);
        let expects_value = value.is_some();
        let is_optional = modifier == Some('?') || !expects_value || is_repeated;

        self.segments.push(Segment::Option(OptionSegment {
            long_form: long_form.map(str::to_string),
            short_form: short_form.map(str::to_string),
            expects_value,
            parameter_name: value.as_ref().map(|v| Arc::from(v.name)),
            type_constraint: value
                .as_ref()
                .and_then(|v| v.type_constraint)
                .map(str::to_string),
            parameter_is_optional: value.as_ref().is_some_and(|v| v.is_optional),
            is_repeated,
            is_optional,
            key: Arc::from(key),
        }));
        Ok(())
    }

    fn finish(self, definition: &RouteDefinition, group_prefix: Option<&str>) -> CompiledRoute {
        let option_segments = self
            .segments
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_positional())
            .map(|(idx, _)| idx)
            .collect();
        let specificity = self.segments.iter().map(Segment::weight).sum();

        CompiledRoute {
            original_pattern: definition.pattern.clone(),
            group_prefix: group_prefix.map(str::to_string),
            segments: self.segments,
            option_segments,
            has_catch_all: self.catch_all.is_some(),
            has_end_of_options: self.seen_end_of_options,
            specificity,
            handler_name: Arc::from(definition.handler_name.as_str()),
            description: definition.description.clone(),
        }
    }
}
