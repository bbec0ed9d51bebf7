pub(crate) trait OptionPredExt<T> {
    fn is_some_and_<F>(&self, pred: F) -> bool
    where
        F: FnOnce(&T) -> bool;
}

impl<T> OptionPredExt<T> for Option<T> {
    fn is_some_and_<F>(&self, pred: F) -> bool
    where
        F: FnOnce(&T) -> bool,
    {
        if let Some(x) = self {
            pred(x)
        } else {
            false
        }
    }
}

pub(crate) trait CharExt {
    /// C `isspace` in the "C" locale; unlike `u8::is_ascii_whitespace` this includes `\v`.
    fn isspace(&self) -> bool;

    fn islower(&self) -> bool;
}

impl CharExt for u8 {
    fn isspace(&self) -> bool {
        matches!(*self, b' ' | b'\t' | b'\n' | b'\x0B' | b'\x0C' | b'\r')
    }

    fn islower(&self) -> bool {
        self.is_ascii_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isspace() {
        for ch in [b' ', b'\t', b'\n', b'\x0B', b'\x0C', b'\r'] {
            assert!(ch.isspace(), "{:?}", ch as char);
        }
        for ch in [b'\0', b'a', b'0', b'_', b'\x1F'] {
            assert!(!ch.isspace(), "{:?}", ch as char);
        }
    }

    #[test]
    fn test_is_some_and() {
        assert!(Some(3).is_some_and_(|&x| x == 3));
        assert!(!Some(3).is_some_and_(|&x| x == 4));
        assert!(!None::<i32>.is_some_and_(|_| true));
    }
}
