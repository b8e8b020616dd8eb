// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Instance loader for symmetric TSP cost matrices.
//!
//! Turns a whitespace-delimited text stream into a validated `Graph`. The
//! format is the city count followed by the strict upper triangle of the cost
//! matrix:
//!
//! ```raw
//! N
//! c_0_1 c_0_2 ... c_0_(N-1)
//! c_1_2 ... c_1_(N-1)
//! ...
//! c_(N-2)_(N-1)
//! ```
//!
//! Line breaks carry no meaning; only token order does. A `#` starts a
//! comment that runs to the end of the line. Anything malformed (a missing
//! value, a token that is not an integer, a non-positive city count, a
//! negative cost, or leftover tokens unless explicitly allowed) is reported
//! as an `InstanceLoadError` before any `Graph` exists.

use crate::{error::GraphError, graph::Graph, num::CostNumeric};
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};
use thiserror::Error;

/// Upper bound on the cost buffer reserved before any cost has been read.
const MAX_INITIAL_CAPACITY: usize = 4096;

/// Details about a failed token parsing attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not parse token '{token}' as type {type_name}")]
pub struct ParseTokenError {
    /// The token that failed to parse.
    pub token: String,
    /// The name of the type the token was parsed into (e.g. "i64").
    pub type_name: &'static str,
}

/// The error type for instance loading.
#[derive(Debug, Error)]
pub enum InstanceLoadError {
    /// An I/O error occurred while reading the input stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The input ended before all expected tokens were read.
    #[error("unexpected end of input while parsing instance")]
    UnexpectedEof,
    /// A token could not be parsed into the expected numeric type.
    #[error("parse error: {0}")]
    Parse(#[from] ParseTokenError),
    /// The city count is not a positive integer.
    #[error("city count must be a positive integer")]
    InvalidDimensions,
    /// Tokens remain after the last expected cost.
    #[error("unexpected trailing data starting at token '{token}'")]
    TrailingData {
        /// The first unexpected token.
        token: String,
    },
    /// The costs were read but do not form a valid graph.
    #[error("invalid cost matrix: {0}")]
    Graph(#[from] GraphError),
}

/// A configurable loader for TSP instances.
///
/// # Configuration
/// * `allow_trailing_data`: If false (the default), tokens after the last
///   expected cost are an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstanceLoader {
    allow_trailing_data: bool,
}

impl InstanceLoader {
    /// Creates a new `InstanceLoader` with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures whether tokens after the last expected cost are accepted.
    #[inline]
    pub fn allow_trailing_data(mut self, yes: bool) -> Self {
        self.allow_trailing_data = yes;
        self
    }

    /// Loads an instance from a type implementing `BufRead`.
    pub fn from_bufread<T, R>(&self, rdr: R) -> Result<Graph<T>, InstanceLoadError>
    where
        T: CostNumeric + FromStr,
        R: BufRead,
    {
        let mut sc = Scanner::new(rdr);

        let num_cities: usize = sc
            .next::<usize>()
            .map_err(|e| match e {
                InstanceLoadError::Parse(_) => InstanceLoadError::InvalidDimensions,
                other => other,
            })?;
        if num_cities == 0 {
            return Err(InstanceLoadError::InvalidDimensions);
        }

        let expected = num_cities
            .checked_mul(num_cities - 1)
            .map(|v| v / 2)
            .ok_or(InstanceLoadError::InvalidDimensions)?;

        // The header is untrusted; grow with the data actually read.
        let mut values: Vec<T> = Vec::with_capacity(expected.min(MAX_INITIAL_CAPACITY));
        for _ in 0..expected {
            values.push(sc.next()?);
        }

        if !self.allow_trailing_data {
            if let Some(token) = sc.next_token()? {
                return Err(InstanceLoadError::TrailingData { token });
            }
        }

        Ok(Graph::from_upper_triangle(num_cities, &values)?)
    }

    /// Loads an instance from a file path.
    #[inline]
    pub fn from_path<T, P>(&self, path: P) -> Result<Graph<T>, InstanceLoadError>
    where
        T: CostNumeric + FromStr,
        P: AsRef<Path>,
    {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads an instance from a generic reader.
    #[inline]
    pub fn from_reader<T, R>(&self, r: R) -> Result<Graph<T>, InstanceLoadError>
    where
        T: CostNumeric + FromStr,
        R: Read,
    {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads an instance from a string slice.
    #[inline]
    pub fn from_str<T>(&self, s: &str) -> Result<Graph<T>, InstanceLoadError>
    where
        T: CostNumeric + FromStr,
    {
        self.from_bufread(s.as_bytes())
    }
}

/// Reads whitespace-delimited tokens, skipping `#` comments.
struct Scanner<R> {
    rdr: R,
    buf: String,
    pos: usize,
}

impl<R: BufRead> Scanner<R> {
    #[inline]
    fn new(rdr: R) -> Self {
        Self {
            rdr,
            buf: String::new(),
            pos: 0,
        }
    }

    /// Refills the line buffer. Returns `Ok(false)` on end of input.
    #[inline]
    fn fill_line(&mut self) -> Result<bool, InstanceLoadError> {
        self.buf.clear();
        self.pos = 0;
        let n = self.rdr.read_line(&mut self.buf)?;
        Ok(n > 0)
    }

    /// Returns the next raw token, or `None` at end of input.
    fn next_token(&mut self) -> Result<Option<String>, InstanceLoadError> {
        loop {
            if self.pos >= self.buf.len() && !self.fill_line()? {
                return Ok(None);
            }

            let rest = &self.buf[self.pos..];
            let content = match rest.find('#') {
                Some(hash) => &rest[..hash],
                None => rest,
            };

            let trimmed = content.trim_start();
            if trimmed.is_empty() {
                // Whitespace or a comment up to the end of the line.
                self.pos = self.buf.len();
                continue;
            }

            let skipped = content.len() - trimmed.len();
            let token_len = trimmed
                .find(char::is_whitespace)
                .unwrap_or(trimmed.len());
            let token = trimmed[..token_len].to_owned();
            self.pos += skipped + token_len;
            return Ok(Some(token));
        }
    }

    /// Reads the next token and parses it into `T`.
    fn next<T>(&mut self) -> Result<T, InstanceLoadError>
    where
        T: FromStr,
    {
        let token = self.next_token()?.ok_or(InstanceLoadError::UnexpectedEof)?;
        token.parse::<T>().map_err(|_| {
            InstanceLoadError::Parse(ParseTokenError {
                token,
                type_name: std::any::type_name::<T>(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::CityIndex;

    const SMALL_INSTANCE: &str = r#"
        4           # N = 4 cities
        10 15 20    # from city 0
        35 25       # from city 1
        30          # from city 2
    "#;

    fn ci(i: usize) -> CityIndex {
        CityIndex::new(i)
    }

    #[test]
    fn test_loads_and_mirrors_costs() {
        let g: Graph<i64> = InstanceLoader::new()
            .from_str(SMALL_INSTANCE)
            .expect("failed to load");

        assert_eq!(g.num_cities(), 4);
        assert_eq!(g.cost(ci(0), ci(1)), 10);
        assert_eq!(g.cost(ci(3), ci(1)), 25);
        assert_eq!(g.cost(ci(2), ci(3)), 30);
    }

    #[test]
    fn test_line_layout_is_irrelevant() {
        let g: Graph<i32> = InstanceLoader::new()
            .from_str("4 10 15 20 35 25 30")
            .unwrap();
        assert_eq!(g.cost(ci(1), ci(2)), 35);
    }

    #[test]
    fn test_single_city() {
        let g: Graph<i64> = InstanceLoader::new().from_str("1\n").unwrap();
        assert_eq!(g.num_cities(), 1);
    }

    #[test]
    fn test_truncated_input() {
        let res: Result<Graph<i64>, _> = InstanceLoader::new().from_str("3 1 2");
        assert!(matches!(res, Err(InstanceLoadError::UnexpectedEof)));

        let res: Result<Graph<i64>, _> = InstanceLoader::new().from_str("# nothing here\n");
        assert!(matches!(res, Err(InstanceLoadError::UnexpectedEof)));
    }

    #[test]
    fn test_huge_header_with_truncated_body_is_an_error() {
        let res: Result<Graph<i64>, _> = InstanceLoader::new().from_str("300000\n1 2 3");
        assert!(matches!(res, Err(InstanceLoadError::UnexpectedEof)));

        #[cfg(target_pointer_width = "64")]
        {
            let res: Result<Graph<i64>, _> = InstanceLoader::new().from_str("4000000000\n1 2 3");
            assert!(matches!(res, Err(InstanceLoadError::UnexpectedEof)));
        }
    }

    #[test]
    fn test_parse_error_structure() {
        let res: Result<Graph<i64>, _> = InstanceLoader::new().from_str("3 1 garbage 2");
        match res {
            Err(InstanceLoadError::Parse(e)) => {
                assert_eq!(e.token, "garbage");
                assert!(e.type_name.contains("i64"));
            }
            other => panic!("expected parse error with context, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_dimensions() {
        let res: Result<Graph<i64>, _> = InstanceLoader::new().from_str("0");
        assert!(matches!(res, Err(InstanceLoadError::InvalidDimensions)));

        let res: Result<Graph<i64>, _> = InstanceLoader::new().from_str("-3 1 2 3");
        assert!(matches!(res, Err(InstanceLoadError::InvalidDimensions)));
    }

    #[test]
    fn test_negative_cost_is_a_graph_error() {
        let res: Result<Graph<i64>, _> = InstanceLoader::new().from_str("3 1 -2 3");
        assert!(matches!(
            res,
            Err(InstanceLoadError::Graph(GraphError::NegativeCost { from: 0, to: 2 }))
        ));
    }

    #[test]
    fn test_trailing_data() {
        let res: Result<Graph<i64>, _> = InstanceLoader::new().from_str("2 5 6 # extra");
        match res {
            Err(InstanceLoadError::TrailingData { token }) => assert_eq!(token, "6"),
            other => panic!("expected trailing data error, got {:?}", other),
        }

        let g: Graph<i64> = InstanceLoader::new()
            .allow_trailing_data(true)
            .from_str("2 5 6")
            .unwrap();
        assert_eq!(g.cost(ci(0), ci(1)), 5);
    }

    #[test]
    fn test_comment_glued_to_token() {
        let g: Graph<i64> = InstanceLoader::new().from_str("2\n7#seven\n").unwrap();
        assert_eq!(g.cost(ci(1), ci(0)), 7);
    }

    #[test]
    fn test_from_path_reports_io_error() {
        let res: Result<Graph<i64>, _> =
            InstanceLoader::new().from_path("/definitely/not/a/real/instance.tsp");
        assert!(matches!(res, Err(InstanceLoadError::Io(_))));
    }

    #[test]
    fn test_from_reader() {
        let data: &[u8] = b"3\n1 2\n3\n";
        let g: Graph<i64> = InstanceLoader::new().from_reader(data).unwrap();
        assert_eq!(g.cost(ci(1), ci(2)), 3);
    }
}
