use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

pub const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
pub const NUMBERS: &[u8] = b"0123456789";
pub const SYMBOLS: &[u8] = b"!@#$%^&*()_+-=[]{}|;:,.<>?";

pub const MIN_LENGTH: usize = 4;
pub const MAX_LENGTH: usize = 64;
pub const DEFAULT_LENGTH: usize = 8;

/// How long the "Copied" indicator stays up after a copy.
pub const COPIED_RESET_MS: u64 = 1_200;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharClass {
    Uppercase,
    Lowercase,
    Numbers,
    Symbols,
}

impl CharClass {
    pub const ALL: [CharClass; 4] = [
        CharClass::Uppercase,
        CharClass::Lowercase,
        CharClass::Numbers,
        CharClass::Symbols,
    ];

    pub fn charset(self) -> &'static [u8] {
        match self {
            CharClass::Uppercase => UPPERCASE,
            CharClass::Lowercase => LOWERCASE,
            CharClass::Numbers => NUMBERS,
            CharClass::Symbols => SYMBOLS,
        }
    }

    pub fn contains(self, c: char) -> bool {
        c.is_ascii() && self.charset().contains(&(c as u8))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordOptions {
    pub length: usize,
    pub include_uppercase: bool,
    pub include_lowercase: bool,
    pub include_numbers: bool,
    pub include_symbols: bool,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            include_uppercase: false,
            include_lowercase: true,
            include_numbers: true,
            include_symbols: true,
        }
    }
}

impl PasswordOptions {
    /// Sets the length, clamped to `MIN_LENGTH..=MAX_LENGTH`.
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length.clamp(MIN_LENGTH, MAX_LENGTH);
        self
    }

    pub fn with_class(mut self, class: CharClass, enabled: bool) -> Self {
        *self.flag_mut(class) = enabled;
        self
    }

    fn flag_mut(&mut self, class: CharClass) -> &mut bool {
        match class {
            CharClass::Uppercase => &mut self.include_uppercase,
            CharClass::Lowercase => &mut self.include_lowercase,
            CharClass::Numbers => &mut self.include_numbers,
            CharClass::Symbols => &mut self.include_symbols,
        }
    }

    pub fn includes(&self, class: CharClass) -> bool {
        match class {
            CharClass::Uppercase => self.include_uppercase,
            CharClass::Lowercase => self.include_lowercase,
            CharClass::Numbers => self.include_numbers,
            CharClass::Symbols => self.include_symbols,
        }
    }

    /// Enabled classes in a fixed order.
    pub fn classes(&self) -> Vec<CharClass> {
        CharClass::ALL
            .into_iter()
            .filter(|&c| self.includes(c))
            .collect()
    }
}

/// Generates a password with the thread-local RNG.
pub fn generate(options: &PasswordOptions) -> String {
    generate_with(options, &mut rand::rng())
}

/// Generates a password of `options.length` characters drawn from the enabled classes.
///
/// Every enabled class contributes at least one character as long as `length` allows it; the
/// rest is drawn uniformly from the union of the enabled sets and the whole is shuffled.
/// With no class enabled the result is empty.
pub fn generate_with<R: Rng + ?Sized>(options: &PasswordOptions, rng: &mut R) -> String {
    let classes = options.classes();
    if classes.is_empty() {
        return String::new();
    }

    let pool: Vec<u8> = classes
        .iter()
        .flat_map(|c| c.charset().iter().copied())
        .collect();

    let mut out: Vec<u8> = classes
        .iter()
        .map(|c| {
            let set = c.charset();
            set[rng.random_range(0..set.len())]
        })
        .collect();
    while out.len() < options.length {
        out.push(pool[rng.random_range(0..pool.len())]);
    }

    out.shuffle(rng);
    out.truncate(options.length);
    out.into_iter().map(char::from).collect()
}

/// Generator widget state: options, the last password, and the copy indicator.
#[derive(Clone, Debug, Default)]
pub struct PasswordGenerator {
    options: PasswordOptions,
    password: String,
    copied_at_ms: Option<u64>,
}

impl PasswordGenerator {
    pub fn new(options: PasswordOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &PasswordOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut PasswordOptions {
        &mut self.options
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn generate(&mut self) -> &str {
        self.generate_with(&mut rand::rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &str {
        self.password = generate_with(&self.options, rng);
        self.copied_at_ms = None;
        &self.password
    }

    /// Returns the text to put on the clipboard, or `None` before anything was generated.
    pub fn copy(&mut self, now_ms: u64) -> Option<&str> {
        if self.password.is_empty() {
            return None;
        }
        self.copied_at_ms = Some(now_ms);
        Some(&self.password)
    }

    pub fn is_copied(&self, now_ms: u64) -> bool {
        self.copied_at_ms
            .is_some_and(|at| now_ms < at.saturating_add(COPIED_RESET_MS))
    }

    pub fn copy_label(&self, now_ms: u64) -> &'static str {
        if self.is_copied(now_ms) { "Copied" } else { "Copy" }
    }

    pub fn display(&self) -> &str {
        if self.password.is_empty() {
            "Click Generate to create a password"
        } else {
            &self.password
        }
    }
}
