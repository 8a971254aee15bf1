// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Ordered, append-only token set with a comma-joined wire form.

use std::collections::HashSet;

use serde::Deserialize;

/// How "already present" is decided before a token is appended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipMode {
    /// Substring search on the comma-joined form.
    ///
    /// This is what existing vocabularies were built with and it is
    /// approximate: `"A"` counts as present once `"USA"` is, so a short
    /// token can be skipped forever.
    #[default]
    Substring,
    /// Exact token equality.
    Exact,
}

/// One facet's vocabulary.
///
/// Tokens keep arrival order, are never removed and never contain a comma,
/// so [`flatten`](Self::flatten) and [`parse`](Self::parse) round-trip.
#[derive(Debug, Clone, Default)]
pub struct FacetSet {
    tokens: Vec<String>,
    members: HashSet<String>,
    flat: String,
}

impl FacetSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-joined vocabulary. Blank pieces and repeats are dropped.
    pub fn parse(flat: &str) -> Self {
        let mut set = Self::new();
        for piece in flat.split(',') {
            set.push(piece.trim());
        }
        set
    }

    /// Build from tokens in order, ignoring membership mode.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for token in tokens {
            set.push(token.as_ref().trim());
        }
        set
    }

    pub fn contains(&self, token: &str, mode: MembershipMode) -> bool {
        match mode {
            MembershipMode::Substring => self.flat.contains(token),
            MembershipMode::Exact => self.members.contains(token),
        }
    }

    /// Append `token` unless it is blank or already present under `mode`.
    ///
    /// A token that itself holds commas is stored as its comma-separated
    /// pieces. Returns the pieces actually appended.
    pub fn insert(&mut self, token: &str, mode: MembershipMode) -> Vec<String> {
        let token = token.trim();
        if token.is_empty() || self.contains(token, mode) {
            return Vec::new();
        }
        token
            .split(',')
            .map(str::trim)
            .filter(|piece| self.push(piece))
            .map(str::to_string)
            .collect()
    }

    fn push(&mut self, token: &str) -> bool {
        if token.is_empty() || self.members.contains(token) {
            return false;
        }
        if !self.flat.is_empty() {
            self.flat.push(',');
        }
        self.flat.push_str(token);
        self.members.insert(token.to_string());
        self.tokens.push(token.to_string());
        true
    }

    /// Tokens in arrival order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Comma-joined wire form, no leading or trailing comma.
    pub fn flatten(&self) -> &str {
        &self.flat
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl PartialEq for FacetSet {
    fn eq(&self, other: &Self) -> bool {
        self.tokens == other.tokens
    }
}

impl Eq for FacetSet {}
