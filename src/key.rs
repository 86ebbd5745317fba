//! Stable cache key derivation for the external-cache path.
//!
//! Local memo tables key on structural equality of the argument tuple, so
//! they never hash at all. Keys only exist for the external-cache path,
//! where the backend is shared across processes — which rules out
//! `DefaultHasher`-style keys (SipHash is seeded per process). This module
//! derives keys that are byte-identical on any run, any machine:
//!
//! 1. Each argument contributes its canonical byte form via [`CanonicalKey`].
//! 2. Every part is length-prefixed (big-endian `u64`) before hashing, so
//!    `("ab", "c")` and `("a", "bc")` can never collide.
//! 3. The parts are folded into a SHA-256 digest, hex-encoded.
//!
//! The full key is `memo_<name>_<digest>` — see [`derive_key`].
//!
//! # Non-deterministic arguments
//!
//! Some values have no canonical byte form (NaN is the canonical example:
//! it compares unequal to itself and has many bit patterns). Deriving a key
//! from one fails with [`MuninnError::DigestNonDeterministic`] before any
//! backend is contacted.

use sha2::{Digest, Sha256};

use crate::error::{MuninnError, Result};

/// A value with a deterministic, self-delimiting byte representation.
///
/// Implementations must produce the same bytes for equal values on every
/// run and every process. Variable-length encodings are length-prefixed so
/// nested containers stay unambiguous.
pub trait CanonicalKey {
    /// Append this value's canonical bytes to `out`.
    ///
    /// Fails with [`MuninnError::DigestNonDeterministic`] if the value has
    /// no canonical form.
    fn append_canonical(&self, out: &mut Vec<u8>) -> Result<()>;
}

impl CanonicalKey for str {
    fn append_canonical(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(&(self.len() as u64).to_be_bytes());
        out.extend_from_slice(self.as_bytes());
        Ok(())
    }
}

impl CanonicalKey for String {
    fn append_canonical(&self, out: &mut Vec<u8>) -> Result<()> {
        self.as_str().append_canonical(out)
    }
}

impl CanonicalKey for bool {
    fn append_canonical(&self, out: &mut Vec<u8>) -> Result<()> {
        out.push(*self as u8);
        Ok(())
    }
}

impl CanonicalKey for char {
    fn append_canonical(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(&(*self as u32).to_be_bytes());
        Ok(())
    }
}

macro_rules! impl_canonical_int {
    ($($ty:ty),+) => {
        $(
            impl CanonicalKey for $ty {
                fn append_canonical(&self, out: &mut Vec<u8>) -> Result<()> {
                    out.extend_from_slice(&self.to_be_bytes());
                    Ok(())
                }
            }
        )+
    };
}

impl_canonical_int!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);

impl CanonicalKey for usize {
    fn append_canonical(&self, out: &mut Vec<u8>) -> Result<()> {
        // Fixed width regardless of platform pointer size.
        (*self as u64).append_canonical(out)
    }
}

impl CanonicalKey for isize {
    fn append_canonical(&self, out: &mut Vec<u8>) -> Result<()> {
        (*self as i64).append_canonical(out)
    }
}

impl CanonicalKey for f32 {
    fn append_canonical(&self, out: &mut Vec<u8>) -> Result<()> {
        if self.is_nan() {
            return Err(MuninnError::DigestNonDeterministic(
                "NaN has no canonical bit pattern".to_string(),
            ));
        }
        // Fold -0.0 into 0.0 so values that compare equal encode equal.
        let normalized = if *self == 0.0 { 0.0_f32 } else { *self };
        out.extend_from_slice(&normalized.to_bits().to_be_bytes());
        Ok(())
    }
}

impl CanonicalKey for f64 {
    fn append_canonical(&self, out: &mut Vec<u8>) -> Result<()> {
        if self.is_nan() {
            return Err(MuninnError::DigestNonDeterministic(
                "NaN has no canonical bit pattern".to_string(),
            ));
        }
        let normalized = if *self == 0.0 { 0.0_f64 } else { *self };
        out.extend_from_slice(&normalized.to_bits().to_be_bytes());
        Ok(())
    }
}

impl<T: CanonicalKey> CanonicalKey for Option<T> {
    fn append_canonical(&self, out: &mut Vec<u8>) -> Result<()> {
        match self {
            None => out.push(0),
            Some(value) => {
                out.push(1);
                value.append_canonical(out)?;
            }
        }
        Ok(())
    }
}

impl<T: CanonicalKey> CanonicalKey for [T] {
    fn append_canonical(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(&(self.len() as u64).to_be_bytes());
        for item in self {
            item.append_canonical(out)?;
        }
        Ok(())
    }
}

impl<T: CanonicalKey> CanonicalKey for Vec<T> {
    fn append_canonical(&self, out: &mut Vec<u8>) -> Result<()> {
        self.as_slice().append_canonical(out)
    }
}

impl<T: CanonicalKey + ?Sized> CanonicalKey for &T {
    fn append_canonical(&self, out: &mut Vec<u8>) -> Result<()> {
        (**self).append_canonical(out)
    }
}

/// An ordered argument tuple whose parts can feed a digest.
///
/// Implemented for `()` and tuples of [`CanonicalKey`] values up to arity 8.
/// Each tuple field becomes one digest part; [`digest`] length-prefixes the
/// parts so adjacent arguments cannot blur together.
pub trait KeyArgs {
    /// Append one canonical byte part per argument, in call order.
    fn append_parts(&self, parts: &mut Vec<Vec<u8>>) -> Result<()>;
}

impl KeyArgs for () {
    fn append_parts(&self, _parts: &mut Vec<Vec<u8>>) -> Result<()> {
        Ok(())
    }
}

impl<A: KeyArgs + ?Sized> KeyArgs for &A {
    fn append_parts(&self, parts: &mut Vec<Vec<u8>>) -> Result<()> {
        (**self).append_parts(parts)
    }
}

macro_rules! impl_key_args {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: CanonicalKey),+> KeyArgs for ($($name,)+) {
            fn append_parts(&self, parts: &mut Vec<Vec<u8>>) -> Result<()> {
                $(
                    let mut part = Vec::new();
                    self.$idx.append_canonical(&mut part)?;
                    parts.push(part);
                )+
                Ok(())
            }
        }
    };
}

impl_key_args!(A0: 0);
impl_key_args!(A0: 0, A1: 1);
impl_key_args!(A0: 0, A1: 1, A2: 2);
impl_key_args!(A0: 0, A1: 1, A2: 2, A3: 3);
impl_key_args!(A0: 0, A1: 1, A2: 2, A3: 3, A4: 4);
impl_key_args!(A0: 0, A1: 1, A2: 2, A3: 3, A4: 4, A5: 5);
impl_key_args!(A0: 0, A1: 1, A2: 2, A3: 3, A4: 4, A5: 5, A6: 6);
impl_key_args!(A0: 0, A1: 1, A2: 2, A3: 3, A4: 4, A5: 5, A6: 6, A7: 7);

/// Compute the hex-encoded SHA-256 digest of an argument tuple.
///
/// Deterministic across processes: equal tuples (by canonical
/// representation) always produce byte-identical digests. Every part is
/// length-prefixed before hashing, so structurally different tuples with
/// identical concatenations (`("ab", "c")` vs `("a", "bc")`) derive
/// different digests.
pub fn digest<A: KeyArgs + ?Sized>(args: &A) -> Result<String> {
    let mut parts = Vec::new();
    args.append_parts(&mut parts)?;

    let mut hasher = Sha256::new();
    for part in &parts {
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Derive the full external-cache key: `memo_<name>_<digest>`.
///
/// `name` identifies the wrapped computation and namespaces its entries in
/// the shared backend; the digest covers the argument tuple.
pub fn derive_key<A: KeyArgs + ?Sized>(name: &str, args: &A) -> Result<String> {
    Ok(format!("memo_{}_{}", name, digest(args)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_deterministic_across_invocations() {
        let d1 = digest(&("hello", 42_u32)).unwrap();
        let d2 = digest(&("hello", 42_u32)).unwrap();
        assert_eq!(d1, d2);
    }

    #[test]
    fn digest_differs_on_value() {
        let d1 = digest(&("hello",)).unwrap();
        let d2 = digest(&("world",)).unwrap();
        assert_ne!(d1, d2);
    }

    #[test]
    fn digest_differs_on_argument_order() {
        let d1 = digest(&("a", "b")).unwrap();
        let d2 = digest(&("b", "a")).unwrap();
        assert_ne!(d1, d2);
    }

    #[test]
    fn adjacent_arguments_do_not_blur() {
        // The classic framing collision: same concatenation, different split.
        let d1 = digest(&("ab", "c")).unwrap();
        let d2 = digest(&("a", "bc")).unwrap();
        assert_ne!(d1, d2);
    }

    #[test]
    fn arity_is_part_of_the_key() {
        let d1 = digest(&("a", "")).unwrap();
        let d2 = digest(&("a",)).unwrap();
        assert_ne!(d1, d2);
    }

    #[test]
    fn nan_is_non_deterministic() {
        let err = digest(&(f64::NAN,)).unwrap_err();
        assert!(matches!(err, MuninnError::DigestNonDeterministic(_)));
    }

    #[test]
    fn negative_zero_folds_into_zero() {
        let d1 = digest(&(0.0_f64,)).unwrap();
        let d2 = digest(&(-0.0_f64,)).unwrap();
        assert_eq!(d1, d2);
    }

    #[test]
    fn nested_vec_is_framed() {
        let d1 = digest(&(vec!["ab".to_string(), "c".to_string()],)).unwrap();
        let d2 = digest(&(vec!["a".to_string(), "bc".to_string()],)).unwrap();
        assert_ne!(d1, d2);
    }

    #[test]
    fn option_tags_presence() {
        let d1 = digest(&(Some(1_u8),)).unwrap();
        let d2 = digest(&(None::<u8>,)).unwrap();
        assert_ne!(d1, d2);
    }

    #[test]
    fn derived_key_format() {
        let key = derive_key("lookup", &("x",)).unwrap();
        assert!(key.starts_with("memo_lookup_"));
        // SHA-256 hex digest is 64 chars.
        assert_eq!(key.len(), "memo_lookup_".len() + 64);
    }

    #[test]
    fn zero_arguments_still_derive() {
        let key = derive_key("constant", &()).unwrap();
        assert!(key.starts_with("memo_constant_"));
    }
}
