use crate::error::{Error, Result};

/// Allocates a filled buffer, reporting allocation failure
/// as an error instead of aborting the process.
pub(crate) fn try_filled<T: Clone>(buffer: &'static str, length: usize, value: T) -> Result<Vec<T>> {
    let bytes = length.saturating_mul(std::mem::size_of::<T>());
    log::trace!("allocating {} bytes for the {} buffer", bytes, buffer);

    let mut vec = Vec::new();
    vec.try_reserve_exact(length)
        .map_err(|_| Error::ResourceExhausted { buffer, bytes })?;

    vec.resize(length, value);
    Ok(vec)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_filled() {
        assert_eq!(try_filled("test", 3, 7_u8).unwrap(), vec![7, 7, 7]);
    }

    #[test]
    fn reports_impossible_allocation() {
        match try_filled("test", usize::MAX / 2, 0_u32) {
            Err(Error::ResourceExhausted { buffer, bytes }) => {
                assert_eq!(buffer, "test");
                assert_eq!(bytes, usize::MAX);
            },
            other => panic!("expected resource exhaustion, got {:?}", other.map(|v| v.len())),
        }
    }
}
