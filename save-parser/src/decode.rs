//! Schema-driven decoding of token streams into typed values.
//!
//! There is no schema file: the shape comes from the destination. Scalars,
//! sequences, options and maps implement [`Decode`] directly. Structured
//! blocks implement [`Record`], which is a per-type key table: it hands out
//! the destination for a key, an optional overlay destination for keys that
//! carry either a scalar or a block, and resets foreign-key fields to their
//! "none" sentinel before a block is read.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use indexmap::IndexMap;

use crate::error::{DecodeError, DecodeErrorKind, DecodeResult};
use crate::source::TokenSource;
use crate::token::{Token, TokenKind};

/// A value that can be filled from the token stream.
///
/// `token` is the first token of the value, already taken from `tokens`.
pub trait Decode {
    fn decode(&mut self, token: Token, tokens: &mut dyn TokenSource) -> DecodeResult;

    /// Records are the only destinations that accept `{ key=value ... }` blocks
    fn is_record(&self) -> bool {
        false
    }
}

/// Key table of a structured block
pub trait Record {
    /// Destination bound to `key`, or `None` if the key is ignored
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode>;

    /// Fallback destination when `key` is followed by a block but its
    /// primary field is not a record (`name="x"` vs `name={ key="x" }`)
    fn overlay(&mut self, _key: &str) -> Option<&mut dyn Decode> {
        None
    }

    /// Set every foreign-key field to its "none" sentinel
    fn reset_references(&mut self) {}
}

pub(crate) fn expect_token(tokens: &mut dyn TokenSource) -> DecodeResult<Token> {
    tokens.next_token().ok_or_else(DecodeError::eof)
}

pub(crate) fn ensure(token: &Token, kind: TokenKind) -> DecodeResult {
    if token.is(kind) {
        Ok(())
    } else {
        Err(DecodeError::unexpected(token, kind))
    }
}

/// Skip the remainder of a block whose opening brace was already consumed
pub fn skip_block(tokens: &mut dyn TokenSource) -> DecodeResult {
    let mut depth = 1usize;
    while depth > 0 {
        match expect_token(tokens)?.kind {
            TokenKind::CollectionStart => depth += 1,
            TokenKind::CollectionEnd => depth -= 1,
            _ => {}
        }
    }
    Ok(())
}

/// Decode a whole document (a record body terminated by end of input)
pub fn decode<T: Record>(tokens: &mut dyn TokenSource, dest: &mut T) -> DecodeResult {
    decode_fields(dest, tokens, true)
}

fn decode_fields<T: Record + ?Sized>(
    record: &mut T,
    tokens: &mut dyn TokenSource,
    top_level: bool,
) -> DecodeResult {
    record.reset_references();

    loop {
        let key_token = match tokens.next_token() {
            Some(token) => token,
            None if top_level => return Ok(()),
            None => return Err(DecodeError::eof()),
        };
        if !top_level && key_token.is(TokenKind::CollectionEnd) {
            return Ok(());
        }
        ensure(&key_token, TokenKind::Identifier)?;

        let eq = expect_token(tokens)?;
        ensure(&eq, TokenKind::EqualSign)?;

        let value = expect_token(tokens)?;
        let key = key_token.text;
        let is_block = value.is(TokenKind::CollectionStart);

        let use_overlay = match record.field(&key) {
            Some(field) => is_block && !field.is_record() && record.overlay(&key).is_some(),
            None => {
                if is_block {
                    skip_block(tokens).map_err(|e| e.within(&key))?;
                }
                continue;
            }
        };

        let field = if use_overlay {
            record.overlay(&key)
        } else {
            record.field(&key)
        };
        if let Some(field) = field {
            field.decode(value, tokens).map_err(|e| e.within(&key))?;
        }
    }
}

impl<T: Record> Decode for T {
    fn decode(&mut self, token: Token, tokens: &mut dyn TokenSource) -> DecodeResult {
        // `key = field_name value` shorthand, e.g. `flag = hsv { 0.5 0.5 0.5 }`
        if token.is(TokenKind::Identifier) {
            self.reset_references();
            if let Some(field) = self.field(&token.text) {
                let next = expect_token(tokens)?;
                return field.decode(next, tokens).map_err(|e| e.within(&token.text));
            }
        }

        ensure(&token, TokenKind::CollectionStart)?;
        decode_fields(self, tokens, false)
    }

    fn is_record(&self) -> bool {
        true
    }
}

impl Decode for bool {
    fn decode(&mut self, token: Token, _tokens: &mut dyn TokenSource) -> DecodeResult {
        ensure(&token, TokenKind::Identifier)?;
        *self = match token.text.as_str() {
            "yes" => true,
            "no" => false,
            _ => {
                return Err(DecodeError::new(DecodeErrorKind::InvalidBoolean {
                    text: token.text,
                    line: token.line,
                }))
            }
        };
        Ok(())
    }
}

macro_rules! impl_decode_number {
    ($($ty:ty),*) => {$(
        impl Decode for $ty {
            fn decode(&mut self, token: Token, _tokens: &mut dyn TokenSource) -> DecodeResult {
                ensure(&token, TokenKind::Number)?;
                *self = token
                    .text
                    .parse::<$ty>()
                    .map_err(|e| DecodeError::invalid_number(&token, e))?;
                Ok(())
            }
        }
    )*};
}

impl_decode_number!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl Decode for String {
    fn decode(&mut self, token: Token, _tokens: &mut dyn TokenSource) -> DecodeResult {
        match token.kind {
            TokenKind::String | TokenKind::Identifier => {
                *self = token.text;
                Ok(())
            }
            _ => Err(DecodeError::unexpected(&token, TokenKind::String)),
        }
    }
}

/// Sequences come in two forms: an explicit `{ a b c }` block, or the same
/// key repeated with scalar values, where every occurrence appends.
impl<T: Decode + Default> Decode for Vec<T> {
    fn decode(&mut self, token: Token, tokens: &mut dyn TokenSource) -> DecodeResult {
        if !token.is(TokenKind::CollectionStart) {
            let mut element = T::default();
            element.decode(token, tokens)?;
            self.push(element);
            return Ok(());
        }

        loop {
            let token = expect_token(tokens)?;
            if token.is(TokenKind::CollectionEnd) {
                return Ok(());
            }
            let mut element = T::default();
            element.decode(token, tokens)?;
            self.push(element);
        }
    }
}

/// `none` decodes to an absent value
impl<T: Decode + Default> Decode for Option<T> {
    fn decode(&mut self, token: Token, tokens: &mut dyn TokenSource) -> DecodeResult {
        if token.is_none_literal() {
            *self = None;
            return Ok(());
        }
        let mut value = T::default();
        value.decode(token, tokens)?;
        *self = Some(value);
        Ok(())
    }
}

fn decode_entries<K, V>(
    token: Token,
    tokens: &mut dyn TokenSource,
    mut insert: impl FnMut(K, V),
) -> DecodeResult
where
    K: Decode + Default,
    V: Decode + Default,
{
    ensure(&token, TokenKind::CollectionStart)?;
    loop {
        let key_token = expect_token(tokens)?;
        if key_token.is(TokenKind::CollectionEnd) {
            return Ok(());
        }
        let key_text = key_token.text.clone();
        let mut key = K::default();
        key.decode(key_token, tokens)?;

        let eq = expect_token(tokens)?;
        ensure(&eq, TokenKind::EqualSign)?;

        let mut value = V::default();
        value
            .decode(expect_token(tokens)?, tokens)
            .map_err(|e| e.within(&key_text))?;
        insert(key, value);
    }
}

impl<K, V, S> Decode for IndexMap<K, V, S>
where
    K: Decode + Default + Hash + Eq,
    V: Decode + Default,
    S: BuildHasher,
{
    fn decode(&mut self, token: Token, tokens: &mut dyn TokenSource) -> DecodeResult {
        decode_entries(token, tokens, |k, v| {
            self.insert(k, v);
        })
    }
}

impl<K, V, S> Decode for HashMap<K, V, S>
where
    K: Decode + Default + Hash + Eq,
    V: Decode + Default,
    S: BuildHasher,
{
    fn decode(&mut self, token: Token, tokens: &mut dyn TokenSource) -> DecodeResult {
        decode_entries(token, tokens, |k, v| {
            self.insert(k, v);
        })
    }
}

impl<K, V> Decode for BTreeMap<K, V>
where
    K: Decode + Default + Ord,
    V: Decode + Default,
{
    fn decode(&mut self, token: Token, tokens: &mut dyn TokenSource) -> DecodeResult {
        decode_entries(token, tokens, |k, v| {
            self.insert(k, v);
        })
    }
}
