//! Equal-length fillers that stand in for matched subtrees during a pass.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Hands out fillers for one pass over one buffer.
///
/// A filler is `$` followed by ASCII alphanumerics. `$` is not Luau syntax,
/// so a filler can only collide with text inside a string or comment; the
/// generator rejects any candidate already present in the buffer or handed
/// out earlier in the pass.
pub(crate) struct Fillers<'a, R> {
    buffer: &'a str,
    issued: Vec<String>,
    rng: R,
}

impl<'a, R: Rng> Fillers<'a, R> {
    pub(crate) fn new(buffer: &'a str, rng: R) -> Self {
        Self {
            buffer,
            issued: Vec::new(),
            rng,
        }
    }

    /// A fresh filler exactly `len` bytes long.
    pub(crate) fn next(&mut self, len: usize) -> String {
        loop {
            let candidate = self.candidate(len);
            let taken = self.buffer.contains(&candidate)
                || self.issued.iter().any(|f| f.contains(&candidate) || candidate.contains(f.as_str()));
            if taken {
                tracing::trace!(%candidate, "filler collides; drawing again");
                continue;
            }
            tracing::trace!(%candidate, "filler");
            self.issued.push(candidate.clone());
            return candidate;
        }
    }

    fn candidate(&mut self, len: usize) -> String {
        if len == 0 {
            return String::new();
        }
        let mut filler = String::with_capacity(len);
        filler.push('$');
        filler.extend((&mut self.rng).sample_iter(&Alphanumeric).take(len - 1).map(char::from));
        filler
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn fillers_match_length_and_shape() {
        let mut fillers = Fillers::new("local x = a // b", StdRng::seed_from_u64(7));
        for len in [4, 6, 33] {
            let filler = fillers.next(len);
            assert_eq!(filler.len(), len);
            assert!(filler.starts_with('$'));
            assert!(filler[1..].bytes().all(|b| b.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn fillers_are_unique_within_a_pass() {
        let mut fillers = Fillers::new("", StdRng::seed_from_u64(1));
        let issued: Vec<_> = (0..200).map(|_| fillers.next(5)).collect();
        for (i, a) in issued.iter().enumerate() {
            for b in &issued[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn fillers_avoid_text_in_the_buffer() {
        // With a two-byte filler there are 62 candidates; exclude all but one
        // through the buffer and the generator must land on the last.
        let alphabet = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
        let buffer: String = alphabet
            .chars()
            .filter(|&c| c != 'q')
            .map(|c| format!("'${c}' "))
            .collect();
        let mut fillers = Fillers::new(&buffer, StdRng::seed_from_u64(3));
        assert_eq!(fillers.next(2), "$q");
    }
}
