//! Deterministic rule-based NLU engine.
//!
//! Parsing runs in two passes. Intent patterns are tried first, in declaration
//! order, and the first full match wins with confidence 1.0. Otherwise every
//! intent is scored by the number of its keywords present in the utterance and
//! the scores are normalised into confidences. Gazetteer entities are extracted
//! afterwards in both cases.

use super::inference::{ModelError, NluModel};
use crate::models::{Entity, IntentPrediction, ModelArtifact, ParseOutcome};
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use std::sync::OnceLock;
use thiserror::Error;

pub const PATTERN_EXTRACTOR: &str = "pattern";
pub const GAZETTEER_EXTRACTOR: &str = "gazetteer";

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Model declares no intents")]
    NoIntents,

    #[error("Intent name must not be empty")]
    EmptyIntentName,

    #[error("Intent '{0}' is declared more than once")]
    DuplicateIntent(String),

    #[error("Entity name must not be empty")]
    EmptyEntityName,

    #[error("Threshold {0} is outside 0.0..=1.0")]
    InvalidThreshold(f64),

    #[error("Invalid pattern '{pattern}' for intent '{intent}': {source}")]
    InvalidPattern {
        intent: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

struct Token {
    norm: String,
    start: usize,
    end: usize,
}

struct CompiledIntent {
    name: String,
    patterns: Vec<Regex>,
    keywords: Vec<Vec<String>>,
}

struct GazetteerEntry {
    tokens: Vec<String>,
    label: String,
    value: String,
}

pub struct RuleBasedModel {
    id: String,
    language: String,
    threshold: f64,
    intents: Vec<CompiledIntent>,
    gazetteer: Vec<GazetteerEntry>,
}

impl RuleBasedModel {
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, CompileError> {
        if artifact.intents.is_empty() {
            return Err(CompileError::NoIntents);
        }
        if !(0.0..=1.0).contains(&artifact.threshold) {
            return Err(CompileError::InvalidThreshold(artifact.threshold));
        }

        let mut seen = HashSet::new();
        let mut intents = Vec::with_capacity(artifact.intents.len());
        for intent in artifact.intents {
            if intent.name.trim().is_empty() {
                return Err(CompileError::EmptyIntentName);
            }
            if !seen.insert(intent.name.clone()) {
                return Err(CompileError::DuplicateIntent(intent.name));
            }

            let patterns = intent
                .patterns
                .iter()
                .map(|pattern| {
                    RegexBuilder::new(&format!("^(?:{})$", pattern))
                        .case_insensitive(true)
                        .build()
                        .map_err(|source| CompileError::InvalidPattern {
                            intent: intent.name.clone(),
                            pattern: pattern.clone(),
                            source,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let mut keywords: Vec<Vec<String>> = Vec::new();
            for keyword in &intent.keywords {
                let tokens = phrase_tokens(keyword);
                if !tokens.is_empty() && !keywords.contains(&tokens) {
                    keywords.push(tokens);
                }
            }

            intents.push(CompiledIntent {
                name: intent.name,
                patterns,
                keywords,
            });
        }

        let mut gazetteer = Vec::new();
        for definition in artifact.entities {
            if definition.name.trim().is_empty() {
                return Err(CompileError::EmptyEntityName);
            }
            for entry in definition.values {
                let phrases = std::iter::once(&entry.value).chain(entry.synonyms.iter());
                for phrase in phrases {
                    let tokens = phrase_tokens(phrase);
                    if tokens.is_empty() {
                        continue;
                    }
                    gazetteer.push(GazetteerEntry {
                        tokens,
                        label: definition.name.clone(),
                        value: entry.value.clone(),
                    });
                }
            }
        }
        // Longest phrase wins; ties keep declaration order.
        gazetteer.sort_by(|a, b| b.tokens.len().cmp(&a.tokens.len()));

        let id = match artifact.version {
            Some(version) => format!("{}@{}", artifact.name, version),
            None => artifact.name,
        };

        Ok(Self {
            id,
            language: artifact.language,
            threshold: artifact.threshold,
            intents,
            gazetteer,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn intent_count(&self) -> usize {
        self.intents.len()
    }

    pub fn analyse(&self, text: &str) -> ParseOutcome {
        let tokens = tokenize(text);

        let (intent_ranking, mut entities) = match self.match_patterns(text) {
            Some((prediction, entities)) => (vec![prediction], entities),
            None => (self.score_keywords(&tokens), Vec::new()),
        };

        let intent = intent_ranking
            .first()
            .filter(|top| top.confidence >= self.threshold)
            .cloned();

        self.extract_gazetteer(&tokens, &mut entities);
        entities.sort_by_key(|e| e.start);

        ParseOutcome {
            text: text.to_string(),
            intent,
            entities,
            intent_ranking,
        }
    }

    fn match_patterns(&self, text: &str) -> Option<(IntentPrediction, Vec<Entity>)> {
        let trimmed = text.trim();
        let offset = text.len() - text.trim_start().len();

        for intent in &self.intents {
            for pattern in &intent.patterns {
                let Some(captures) = pattern.captures(trimmed) else {
                    continue;
                };

                let entities = pattern
                    .capture_names()
                    .flatten()
                    .filter_map(|group| {
                        let m = captures.name(group)?;
                        if m.as_str().is_empty() {
                            return None;
                        }
                        let start = char_offset(text, offset + m.start());
                        Some(Entity {
                            entity: group.to_string(),
                            value: m.as_str().to_string(),
                            start,
                            end: start + m.as_str().chars().count(),
                            extractor: PATTERN_EXTRACTOR.to_string(),
                        })
                    })
                    .collect();

                let prediction = IntentPrediction {
                    name: intent.name.clone(),
                    confidence: 1.0,
                };
                return Some((prediction, entities));
            }
        }

        None
    }

    fn score_keywords(&self, tokens: &[Token]) -> Vec<IntentPrediction> {
        let mut scores: Vec<(usize, usize)> = self
            .intents
            .iter()
            .enumerate()
            .map(|(idx, intent)| {
                let hits = intent
                    .keywords
                    .iter()
                    .filter(|keyword| contains_sequence(tokens, keyword))
                    .count();
                (idx, hits)
            })
            .filter(|(_, hits)| *hits > 0)
            .collect();

        let total: usize = scores.iter().map(|(_, hits)| hits).sum();
        if total == 0 {
            return Vec::new();
        }

        scores.sort_by(|a, b| b.1.cmp(&a.1));
        scores
            .into_iter()
            .map(|(idx, hits)| IntentPrediction {
                name: self.intents[idx].name.clone(),
                confidence: hits as f64 / total as f64,
            })
            .collect()
    }

    fn extract_gazetteer(&self, tokens: &[Token], entities: &mut Vec<Entity>) {
        let mut i = 0;
        while i < tokens.len() {
            let start = tokens[i].start;
            // Longest phrase at this token that stays clear of existing spans.
            let hit = self.gazetteer.iter().find_map(|entry| {
                if !matches_at(tokens, i, &entry.tokens) {
                    return None;
                }
                let end = tokens[i + entry.tokens.len() - 1].end;
                let overlaps = entities.iter().any(|e| start < e.end && e.start < end);
                (!overlaps).then_some((entry, end))
            });

            match hit {
                Some((entry, end)) => {
                    entities.push(Entity {
                        entity: entry.label.clone(),
                        value: entry.value.clone(),
                        start,
                        end,
                        extractor: GAZETTEER_EXTRACTOR.to_string(),
                    });
                    i += entry.tokens.len();
                }
                None => i += 1,
            }
        }
    }
}

impl NluModel for RuleBasedModel {
    fn name(&self) -> &str {
        &self.id
    }

    fn parse(&self, text: &str) -> Result<ParseOutcome, ModelError> {
        Ok(self.analyse(text))
    }
}

fn word_pattern() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"\w+").expect("word pattern is valid"))
}

/// Split into lower-cased word tokens carrying character offsets.
fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars_before = 0;
    let mut last_byte = 0;

    for m in word_pattern().find_iter(text) {
        chars_before += text[last_byte..m.start()].chars().count();
        let len = m.as_str().chars().count();
        tokens.push(Token {
            norm: m.as_str().to_lowercase(),
            start: chars_before,
            end: chars_before + len,
        });
        chars_before += len;
        last_byte = m.end();
    }

    tokens
}

fn phrase_tokens(phrase: &str) -> Vec<String> {
    tokenize(phrase).into_iter().map(|t| t.norm).collect()
}

fn matches_at(tokens: &[Token], at: usize, phrase: &[String]) -> bool {
    tokens.len() - at >= phrase.len()
        && tokens[at..at + phrase.len()]
            .iter()
            .zip(phrase)
            .all(|(token, word)| token.norm == *word)
}

fn contains_sequence(tokens: &[Token], phrase: &[String]) -> bool {
    (0..tokens.len()).any(|at| matches_at(tokens, at, phrase))
}

fn char_offset(text: &str, byte: usize) -> usize {
    text[..byte].chars().count()
}
