use vidocq_api as api;

use api::headers::MacsecHeader;

use crate::bits;
use crate::dissectors::Error;
use crate::wire;

/// Simplified 4-byte SecTAG: TCI/AN octet, short length octet, 16-bit
/// packet number. The full protocol carries a 32-bit (or extended) packet
/// number and an optional SCI; those are out of scope here.
pub fn dissect(data: &[u8]) -> Result<MacsecHeader, Error> {
    // same shape a cursor read would produce: the read starts at the head
    // of the slice and falls short by `needed` bytes
    if data.len() < 4 {
        return Err(Error::Truncated {
            offset: 0,
            needed: 4 - data.len(),
        });
    }

    let tci = data[0] as u32;
    Ok(MacsecHeader {
        end_station: bits::extract(tci, 6, 1) == 1,
        sci_present: bits::extract(tci, 5, 1) == 1,
        epon: bits::extract(tci, 4, 1) == 1,
        encrypted: bits::extract(tci, 3, 1) == 1,
        changed_text: bits::extract(tci, 2, 1) == 1,
        an: bits::extract(tci, 0, 2) as u8,
        short_length: bits::extract(data[1] as u32, 0, 6) as u8,
        packet_number: wire::to_host_u16([data[2], data[3]]),
    })
}
