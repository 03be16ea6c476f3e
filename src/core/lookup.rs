//! Dictionary lookup client.
//!
//! Thin boundary over the Free Dictionary API. The rest of the crate only
//! consumes the fixed `WordData` shape; everything upstream-specific lives in
//! the response parsing here.

use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{AudioLinks, Definition, Phonetic, WordData};
use async_trait::async_trait;
use serde_json::Value;

const API_BASE: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";

/// Total definitions kept per word.
const MAX_DEFINITIONS: usize = 5;
/// Definitions kept per part-of-speech bucket.
const MAX_PER_PART_OF_SPEECH: usize = 2;

/// Async word lookup boundary.
#[async_trait]
pub trait LookupClient: Send + Sync {
    async fn fetch(&self, word: &str) -> AppResult<WordData>;
}

/// Free Dictionary API client.
pub struct DictionaryApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl DictionaryApiClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: API_BASE.to_string(),
        }
    }

    /// Point the client at a different endpoint, for self-hosted mirrors.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for DictionaryApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LookupClient for DictionaryApiClient {
    async fn fetch(&self, word: &str) -> AppResult<WordData> {
        let url = format!("{}/{}", self.base_url, urlencoding::encode(word));

        let response = self
            .client
            .get(&url)
            .header("User-Agent", "Mozilla/5.0")
            .send()
            .await
            .map_err(|e| {
                eprintln!("[LookupClient] Request failed: {}", e);
                AppError::Network("Failed to reach dictionary service".to_string())
            })?;

        if response.status().as_u16() == 404 {
            return Err(AppError::LookupNotFound(word.to_string()));
        }
        if !response.status().is_success() {
            eprintln!(
                "[LookupClient] Dictionary API returned {}",
                response.status()
            );
            return Err(AppError::Network(format!(
                "Dictionary service error for '{}'",
                word
            )));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| AppError::Network(format!("Malformed dictionary response: {}", e)))?;

        parse_word_data(&json, word).ok_or_else(|| AppError::LookupNotFound(word.to_string()))
    }
}

/// Reduce the upstream payload to the fixed `WordData` shape.
///
/// The first entry wins. Audio links are attributed to a variant by the
/// "-uk"/"_uk" and "-us"/"_us" hints in their URLs. The upstream provides no
/// translations, so that field is always empty.
pub fn parse_word_data(json: &Value, requested: &str) -> Option<WordData> {
    let entry = json.as_array()?.first()?;

    let word = entry
        .get("word")
        .and_then(Value::as_str)
        .unwrap_or(requested)
        .to_string();

    let empty = Vec::new();
    let phonetics = entry
        .get("phonetics")
        .and_then(Value::as_array)
        .unwrap_or(&empty);

    let phonetic_text = phonetics
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .find(|t| !t.is_empty())
        .unwrap_or_default()
        .to_string();

    let audio_with_hint = |hints: [&str; 2]| -> String {
        phonetics
            .iter()
            .filter_map(|p| p.get("audio").and_then(Value::as_str))
            .find(|a| hints.iter().any(|h| a.contains(h)))
            .unwrap_or_default()
            .to_string()
    };

    let mut definitions = Vec::new();
    if let Some(meanings) = entry.get("meanings").and_then(Value::as_array) {
        for meaning in meanings {
            let part_of_speech = meaning
                .get("partOfSpeech")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string();

            if let Some(defs) = meaning.get("definitions").and_then(Value::as_array) {
                for def in defs.iter().take(MAX_PER_PART_OF_SPEECH) {
                    definitions.push(Definition {
                        part_of_speech: part_of_speech.clone(),
                        definition: def
                            .get("definition")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                        example: def
                            .get("example")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                        translation: String::new(),
                    });
                }
            }
        }
    }
    definitions.truncate(MAX_DEFINITIONS);

    Some(WordData {
        word,
        phonetic: Phonetic {
            uk: phonetic_text.clone(),
            us: phonetic_text,
        },
        audio: AudioLinks {
            uk: audio_with_hint(["-uk", "_uk"]),
            us: audio_with_hint(["-us", "_us"]),
        },
        definitions,
    })
}

/// Canned word data for offline development and tests.
pub fn mock_word_data(word: &str) -> WordData {
    WordData {
        word: word.to_string(),
        phonetic: Phonetic {
            uk: "/test/".to_string(),
            us: "/test/".to_string(),
        },
        audio: AudioLinks::default(),
        definitions: vec![Definition {
            part_of_speech: "noun".to_string(),
            definition: "This is a test definition for the word.".to_string(),
            example: "This is an example sentence.".to_string(),
            translation: String::new(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> Value {
        json!([{
            "word": "apple",
            "phonetics": [
                { "text": "", "audio": "" },
                { "text": "/ˈæp.əl/", "audio": "https://cdn.example/apple-uk.mp3" },
                { "audio": "https://cdn.example/apple-us.mp3" }
            ],
            "meanings": [
                {
                    "partOfSpeech": "noun",
                    "definitions": [
                        { "definition": "A round fruit.", "example": "An apple a day." },
                        { "definition": "The tree bearing such fruit." },
                        { "definition": "A third definition that must be dropped." }
                    ]
                },
                {
                    "partOfSpeech": "verb",
                    "definitions": [
                        { "definition": "Rare verb sense one." },
                        { "definition": "Rare verb sense two." },
                        { "definition": "Rare verb sense three." }
                    ]
                },
                {
                    "partOfSpeech": "adjective",
                    "definitions": [
                        { "definition": "Sense five." },
                        { "definition": "Sense six, past the overall cap." }
                    ]
                }
            ]
        }])
    }

    #[test]
    fn test_parse_caps_definitions_per_bucket_and_overall() {
        let data = parse_word_data(&sample_payload(), "apple").unwrap();
        assert_eq!(data.word, "apple");
        // Two per part of speech, five overall.
        assert_eq!(data.definitions.len(), 5);
        assert_eq!(
            data.definitions
                .iter()
                .filter(|d| d.part_of_speech == "noun")
                .count(),
            2
        );
        assert_eq!(data.definitions[4].part_of_speech, "adjective");
    }

    #[test]
    fn test_parse_selects_audio_by_variant_hint() {
        let data = parse_word_data(&sample_payload(), "apple").unwrap();
        assert_eq!(data.audio.uk, "https://cdn.example/apple-uk.mp3");
        assert_eq!(data.audio.us, "https://cdn.example/apple-us.mp3");
        assert_eq!(data.phonetic.uk, "/ˈæp.əl/");
    }

    #[test]
    fn test_parse_translation_always_empty() {
        let data = parse_word_data(&sample_payload(), "apple").unwrap();
        assert!(data.definitions.iter().all(|d| d.translation.is_empty()));
    }

    #[test]
    fn test_parse_missing_fields_degrade_to_empty() {
        let payload = json!([{ "word": "bare" }]);
        let data = parse_word_data(&payload, "bare").unwrap();
        assert_eq!(data.word, "bare");
        assert!(data.definitions.is_empty());
        assert!(data.phonetic.uk.is_empty());
        assert!(data.audio.us.is_empty());
    }

    #[test]
    fn test_parse_empty_array_is_none() {
        assert!(parse_word_data(&json!([]), "ghost").is_none());
        assert!(parse_word_data(&json!({"title": "No Definitions Found"}), "ghost").is_none());
    }

    #[test]
    fn test_mock_word_data_shape() {
        let data = mock_word_data("apple");
        assert_eq!(data.word, "apple");
        assert_eq!(data.definitions.len(), 1);
    }
}
