//! Secret word bank.

use tracing::{debug, instrument};

use crate::{Pool, SpyError};

/// Words used when no custom bank is configured.
pub const DEFAULT_WORDS: &[&str] = &[
    "Playa", "Hospital", "Escuela", "Aeropuerto", "Restaurante", "Biblioteca",
    "Cine", "Supermercado", "Banco", "Circo", "Museo", "Estadio", "Gimnasio",
    "Iglesia", "Hotel", "Submarino", "Barco pirata", "Estación espacial",
    "Zoológico", "Parque de diversiones", "Granja", "Castillo", "Desierto",
    "Selva", "Polo Norte", "Tren", "Avión", "Casino", "Peluquería", "Cárcel",
    "Universidad", "Teatro", "Farmacia", "Panadería", "Volcán", "Isla desierta",
    "Discoteca", "Boda", "Cumpleaños", "Concierto", "Camping", "Oficina",
    "Laboratorio", "Cementerio", "Mercado", "Piscina", "Embajada", "Comisaría",
    "Estación de bomberos", "Spa", "Montaña rusa", "Faro", "Mina", "Pirámide",
    "Crucero", "Taxi", "Ascensor", "Cocina", "Jardín", "Metro",
];

/// A non-empty list of candidate secret words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordBank(Vec<String>);

impl WordBank {
    /// Builds a bank from the given words, dropping blank entries.
    ///
    /// # Errors
    ///
    /// Returns [`SpyError::EmptyPool`] if no usable word remains.
    #[instrument(skip(words))]
    pub fn new(words: Vec<String>) -> Result<Self, SpyError> {
        let words: Vec<String> = words
            .into_iter()
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();

        if words.is_empty() {
            return Err(SpyError::EmptyPool(Pool::Words));
        }

        debug!(count = words.len(), "Word bank loaded");
        Ok(Self(words))
    }

    /// Parses a newline-separated word list.
    ///
    /// Lines starting with `#` are comments.
    pub fn from_lines(text: &str) -> Result<Self, SpyError> {
        Self::new(
            text.lines()
                .filter(|line| !line.trim_start().starts_with('#'))
                .map(str::to_string)
                .collect(),
        )
    }

    /// Returns the words.
    pub fn words(&self) -> &[String] {
        &self.0
    }

    /// Number of words in the bank.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; a bank cannot be constructed empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for WordBank {
    fn default() -> Self {
        Self(DEFAULT_WORDS.iter().map(|w| w.to_string()).collect())
    }
}
