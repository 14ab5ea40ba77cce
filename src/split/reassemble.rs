//! Reassembly of per-carrier chunks into the payload.

/// Concatenate chunks in the order given.
///
/// The order must be the carrier order used at encode time. Nothing in the
/// chunks identifies their position, so a permuted list yields a well-formed
/// but wrong payload.
pub fn concatenate<C: AsRef<[u8]>>(chunks: &[C]) -> Vec<u8> {
    let total = chunks.iter().map(|chunk| chunk.as_ref().len()).sum();
    let mut payload = Vec::with_capacity(total);
    for chunk in chunks {
        payload.extend_from_slice(chunk.as_ref());
    }
    payload
}
