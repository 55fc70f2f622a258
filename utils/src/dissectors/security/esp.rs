use vidocq_api as api;

use api::headers::EspHeader;

use crate::dissectors::Error;
use crate::wire;

/// The 8-byte ESP prefix: SPI then sequence number. Everything after it is
/// ciphertext, so this is as deep as the decode goes.
pub fn dissect(data: &[u8]) -> Result<EspHeader, Error> {
    // same shape a cursor read would produce: the read starts at the head
    // of the slice and falls short by `needed` bytes
    if data.len() < 8 {
        return Err(Error::Truncated {
            offset: 0,
            needed: 8 - data.len(),
        });
    }

    Ok(EspHeader {
        spi: wire::to_host_u32([data[0], data[1], data[2], data[3]]),
        sequence: wire::to_host_u32([data[4], data[5], data[6], data[7]]),
    })
}
