//! Query parser for converting string queries to structured query objects.

use std::iter::Peekable;
use std::str::Chars;

use crate::document::converter::parse_datetime;
use crate::error::{Result, UserSearchError};
use crate::query::boolean::{BooleanQueryBuilder, Occur};
use crate::query::query::Query;
use crate::query::range::{DateRangeQuery, NumericRangeQuery};

/// A query-string parser.
///
/// Schema-less: no field validation, accepts any field name.
#[derive(Debug, Default)]
pub struct QueryParser;

impl QueryParser {
    /// Create a new query parser.
    pub fn new() -> Self {
        QueryParser
    }

    /// Parse a query string into a Query.
    ///
    /// Supported syntax:
    /// - Simple terms: `jane` (searched in all text fields)
    /// - Field-specific terms: `gender:female`
    /// - Phrases: `"jane doe"`, `lastname:"van dyke"`
    /// - Required / forbidden clauses: `+gender:female -lastname:smith`
    /// - Ranges: `age:>=45`, `age:<18`, `created_at:>"2020-01-01"`
    /// - Numeric equality: `age:30`
    ///
    /// An empty query string matches nothing.
    pub fn parse(&self, query_str: &str) -> Result<Query> {
        let trimmed = query_str.trim();
        if trimmed.is_empty() {
            return Ok(Query::MatchNone);
        }

        let mut parser = QueryStringParser::new(trimmed);
        parser.parse()
    }
}

/// Internal parser for parsing query strings.
struct QueryStringParser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> QueryStringParser<'a> {
    fn new(query_str: &'a str) -> Self {
        QueryStringParser {
            chars: query_str.chars().peekable(),
        }
    }

    fn parse(&mut self) -> Result<Query> {
        let mut clauses = Vec::new();

        loop {
            self.skip_whitespace();
            if self.chars.peek().is_none() {
                break;
            }
            clauses.push(self.parse_clause()?);
        }

        // A lone optional clause needs no boolean wrapper
        if clauses.len() == 1 && clauses[0].1 == Occur::Should {
            if let Some((query, _)) = clauses.pop() {
                return Ok(query);
            }
        }

        let builder = clauses
            .into_iter()
            .fold(BooleanQueryBuilder::new(), |builder, (query, occur)| {
                builder.clause(query, occur)
            });

        Ok(Query::Boolean(builder.build()))
    }

    fn parse_clause(&mut self) -> Result<(Query, Occur)> {
        // Check for prefix operators
        let occur = match self.chars.peek() {
            Some('+') => {
                self.chars.next();
                Occur::Must
            }
            Some('-') => {
                self.chars.next();
                Occur::MustNot
            }
            _ => Occur::Should,
        };

        self.skip_whitespace();

        if self.chars.peek().is_none() {
            return Err(UserSearchError::parse(
                "Expected a clause after '+' or '-' but found end of input",
            ));
        }

        // Check for quoted phrase
        if self.chars.peek() == Some(&'"') {
            let phrase = self.parse_quoted()?;
            return Ok((Query::Phrase { field: None, text: phrase }, occur));
        }

        let (word, stopped_at_colon) = self.consume_word(true)?;

        if !stopped_at_colon {
            return Ok((Query::text_match(word), occur));
        }

        // Consume ':'
        self.chars.next();

        if word.is_empty() {
            return Err(UserSearchError::parse("Missing field name before ':'"));
        }

        let query = self.parse_field_value(word)?;
        Ok((query, occur))
    }

    fn parse_field_value(&mut self, field: String) -> Result<Query> {
        match self.chars.peek() {
            None => Err(UserSearchError::parse(format!(
                "Missing value for field '{field}'"
            ))),
            Some(ch) if ch.is_whitespace() => Err(UserSearchError::parse(format!(
                "Missing value for field '{field}'"
            ))),
            Some('"') => {
                let phrase = self.parse_quoted()?;
                Ok(Query::Phrase {
                    field: Some(field),
                    text: phrase,
                })
            }
            Some('>') | Some('<') => self.parse_range(field),
            Some(_) => {
                let (value, _) = self.consume_word(false)?;

                match parse_number(&value) {
                    // Numbers may be indexed as text or as numeric values
                    Some(number) => Ok(Query::Boolean(
                        BooleanQueryBuilder::new()
                            .should(Query::field_match(field.clone(), value))
                            .should(Query::NumericRange(NumericRangeQuery::exact(field, number)))
                            .build(),
                    )),
                    None => Ok(Query::field_match(field, value)),
                }
            }
        }
    }

    fn parse_range(&mut self, field: String) -> Result<Query> {
        let greater = self.chars.next() == Some('>');
        let inclusive = if self.chars.peek() == Some(&'=') {
            self.chars.next();
            true
        } else {
            false
        };

        let value = match self.chars.peek() {
            Some('"') => self.parse_quoted()?,
            Some(ch) if !ch.is_whitespace() => self.consume_word(false)?.0,
            _ => {
                return Err(UserSearchError::parse(format!(
                    "Missing range value for field '{field}'"
                )));
            }
        };

        if let Some(number) = parse_number(&value) {
            let range = match (greater, inclusive) {
                (true, true) => NumericRangeQuery::greater_than_or_equal(field, number),
                (true, false) => NumericRangeQuery::greater_than(field, number),
                (false, true) => NumericRangeQuery::less_than_or_equal(field, number),
                (false, false) => NumericRangeQuery::less_than(field, number),
            };
            return Ok(Query::NumericRange(range));
        }

        if let Some(date) = parse_datetime(&value) {
            let range = match (greater, inclusive) {
                (true, true) => DateRangeQuery::greater_than_or_equal(field, date),
                (true, false) => DateRangeQuery::greater_than(field, date),
                (false, true) => DateRangeQuery::less_than_or_equal(field, date),
                (false, false) => DateRangeQuery::less_than(field, date),
            };
            return Ok(Query::DateRange(range));
        }

        Err(UserSearchError::parse(format!(
            "Range value '{value}' for field '{field}' is neither a number nor a date"
        )))
    }

    fn parse_quoted(&mut self) -> Result<String> {
        // Consume opening quote
        self.chars.next();

        let mut phrase = String::new();
        while let Some(ch) = self.chars.next() {
            match ch {
                '"' => return Ok(phrase),
                '\\' => {
                    if let Some(escaped) = self.chars.next() {
                        phrase.push(escaped);
                    }
                }
                _ => phrase.push(ch),
            }
        }

        Err(UserSearchError::parse(format!(
            "Unterminated quoted phrase: \"{phrase}"
        )))
    }

    /// Read a word up to whitespace (or an unescaped ':' when `stop_at_colon`).
    /// Returns the word and whether it stopped at a colon.
    fn consume_word(&mut self, stop_at_colon: bool) -> Result<(String, bool)> {
        let mut word = String::new();

        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                break;
            }
            if stop_at_colon && ch == ':' {
                return Ok((word, true));
            }
            self.chars.next();
            if ch == '\\' {
                match self.chars.next() {
                    Some(escaped) => word.push(escaped),
                    None => {
                        return Err(UserSearchError::parse(
                            "Dangling escape character at end of input",
                        ));
                    }
                }
            } else {
                word.push(ch);
            }
        }

        if word.is_empty() {
            Err(UserSearchError::parse("Expected word but found end of input"))
        } else {
            Ok((word, false))
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.chars.next();
            } else {
                break;
            }
        }
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_term() {
        let parser = QueryParser::new();

        let query = parser.parse("jane").unwrap();
        assert_eq!(query, Query::text_match("jane"));
    }

    #[test]
    fn test_parse_field_term() {
        let parser = QueryParser::new();

        let query = parser.parse("gender:female").unwrap();
        assert_eq!(query.description(), "gender:female");
    }

    #[test]
    fn test_parse_required_and_forbidden() {
        let parser = QueryParser::new();

        let query = parser.parse("+gender:female -lastname:smith jane").unwrap();
        assert_eq!(query.description(), "(+gender:female -lastname:smith jane)");
    }

    #[test]
    fn test_parse_operator_followed_by_space() {
        let parser = QueryParser::new();

        let query = parser.parse("+ gender:female + age:>=45").unwrap();
        assert_eq!(query.description(), "(+gender:female +age:[45 TO *])");
    }

    #[test]
    fn test_parse_numeric_ranges() {
        let parser = QueryParser::new();

        assert_eq!(parser.parse("age:>45").unwrap().description(), "age:{45 TO *]");
        assert_eq!(parser.parse("age:<18").unwrap().description(), "age:[* TO 18}");
        assert_eq!(parser.parse("age:<=18").unwrap().description(), "age:[* TO 18]");
    }

    #[test]
    fn test_parse_date_range() {
        let parser = QueryParser::new();

        let query = parser.parse("created_at:>\"2020-01-01\"").unwrap();
        assert!(matches!(query, Query::DateRange(_)));
        assert_eq!(query.field(), Some("created_at"));
    }

    #[test]
    fn test_parse_numeric_equality() {
        let parser = QueryParser::new();

        let query = parser.parse("age:30").unwrap();
        assert_eq!(query.description(), "(age:30 age:[30 TO 30])");
    }

    #[test]
    fn test_parse_phrase() {
        let parser = QueryParser::new();

        let query = parser.parse("lastname:\"van dyke\"").unwrap();
        assert_eq!(query.description(), "lastname:\"van dyke\"");

        let query = parser.parse("\"jane doe\"").unwrap();
        assert_eq!(query.description(), "\"jane doe\"");
    }

    #[test]
    fn test_parse_escaped_colon() {
        let parser = QueryParser::new();

        let query = parser.parse("a\\:b").unwrap();
        assert_eq!(query, Query::text_match("a:b"));
    }

    #[test]
    fn test_parse_empty_query() {
        let parser = QueryParser::new();

        assert_eq!(parser.parse("").unwrap(), Query::MatchNone);
        assert_eq!(parser.parse("   ").unwrap(), Query::MatchNone);
    }

    #[test]
    fn test_parse_errors() {
        let parser = QueryParser::new();

        assert!(parser.parse("+").is_err());
        assert!(parser.parse("gender:").is_err());
        assert!(parser.parse("gender: female").is_err());
        assert!(parser.parse(":female").is_err());
        assert!(parser.parse("\"unterminated").is_err());
        assert!(parser.parse("age:>old").is_err());
        assert!(parser.parse("age:>").is_err());
    }

    #[test]
    fn test_only_must_not() {
        let parser = QueryParser::new();

        let query = parser.parse("-gender:male").unwrap();
        assert_eq!(query.description(), "(-gender:male)");
    }
}
