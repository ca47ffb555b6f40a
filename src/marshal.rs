//! Versioned binary serialization for `HyperLogLogPlus`: an 8-byte header
//! followed by either a sparse (varint delta list) or dense (bit-packed
//! register) payload.

use crate::bits::{calc_position, divide_by_8_round_up, read_u8_bits, write_u8_bits};
use crate::codec::SPARSE_PRECISION;
use crate::delta_list::DeltaList;
use crate::hllpp::HyperLogLogPlus;
use crate::settings::{Settings, MAX_LOG2M_PLUS};
use crate::HllError;

const HEADER_LEN: usize = 8;
const MARSHAL_VERSION: u16 = 1;
const FLAG_SPARSE: u16 = 1;

fn reg_width_for(reg: &[u8]) -> u8 {
    let max = reg.iter().copied().max().unwrap_or(0);
    if max < 16 {
        4
    } else if max < 32 {
        5
    } else {
        6
    }
}

fn write_header(buf: &mut Vec<u8>, length: u16, flags: u16, p: u8) {
    buf.extend_from_slice(&MARSHAL_VERSION.to_be_bytes());
    buf.extend_from_slice(&length.to_be_bytes());
    buf.extend_from_slice(&flags.to_be_bytes());
    buf.push(p);
    buf.push(SPARSE_PRECISION);
}

pub(crate) fn marshal_sparse(p: u8, delta_list: &DeltaList) -> Vec<u8> {
    let payload_len = 4 + 4 + delta_list.byte_len();
    let total = HEADER_LEN + payload_len;

    let mut buf = Vec::with_capacity(total);
    write_header(&mut buf, total as u16, FLAG_SPARSE, p);
    buf.extend_from_slice(&delta_list.count().to_be_bytes());
    buf.extend_from_slice(&delta_list.last().to_be_bytes());
    buf.extend_from_slice(delta_list.as_bytes());

    buf
}

pub(crate) fn marshal_dense(p: u8, reg: &[u8]) -> Vec<u8> {
    let reg_size = reg_width_for(reg);
    let packed_len = divide_by_8_round_up(reg.len() as u32 * reg_size as u32) as usize;
    let total = HEADER_LEN + 1 + packed_len;

    let mut buf = Vec::with_capacity(total);
    write_header(&mut buf, total as u16, 0, p);
    buf.push(reg_size);

    let start = buf.len();
    buf.resize(start + packed_len, 0);
    for (i, &r) in reg.iter().enumerate() {
        let (idx, pos) = calc_position(i as u32, reg_size);
        write_u8_bits(&mut buf[start..], idx, pos, r, reg_size);
    }

    buf
}

pub(crate) fn unmarshal(data: &[u8]) -> Result<HyperLogLogPlus, HllError> {
    if data.len() < HEADER_LEN {
        return Err(HllError::Truncated(data.len()));
    }

    let version = u16::from_be_bytes([data[0], data[1]]);
    if version != MARSHAL_VERSION {
        return Err(HllError::UnknownVersion(version));
    }

    let length = u16::from_be_bytes([data[2], data[3]]);
    let flags = u16::from_be_bytes([data[4], data[5]]);
    let p = data[6];
    let p_prime = data[7];

    if p_prime != SPARSE_PRECISION {
        return Err(HllError::UnexpectedSparsePrecision(p_prime));
    }
    if length as usize != data.len() {
        return Err(HllError::LengthMismatch {
            declared: length as u32,
            actual: data.len(),
        });
    }

    let settings = Settings::new(p, MAX_LOG2M_PLUS)?;

    if flags & FLAG_SPARSE != 0 {
        let body = &data[HEADER_LEN..];
        if body.len() < 8 {
            return Err(HllError::Truncated(data.len()));
        }
        let count = u32::from_be_bytes([body[0], body[1], body[2], body[3]]);
        let last = u32::from_be_bytes([body[4], body[5], body[6], body[7]]);
        let delta_list = DeltaList::from_parts(count, last, body[8..].to_vec());
        Ok(HyperLogLogPlus::from_sparse_parts(settings, delta_list))
    } else {
        let body = &data[HEADER_LEN..];
        if body.is_empty() {
            return Err(HllError::Truncated(data.len()));
        }
        let reg_size = body[0];
        let packed = &body[1..];

        let mut reg = vec![0u8; settings.m as usize];
        for (i, slot) in reg.iter_mut().enumerate() {
            let (idx, pos) = calc_position(i as u32, reg_size);
            *slot = read_u8_bits(packed, idx, pos, reg_size);
        }

        Ok(HyperLogLogPlus::from_dense_parts(settings, reg))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::delta_list::DeltaList;

    #[test]
    fn dense_round_trips_through_bit_packing() {
        let p = 6u8;
        let m = 1usize << p;
        let mut reg = vec![0u8; m];
        for (i, slot) in reg.iter_mut().enumerate() {
            *slot = (i % 40) as u8;
        }

        let bytes = marshal_dense(p, &reg);
        let parsed = unmarshal(&bytes).unwrap();
        match parsed {
            HyperLogLogPlus::Dense { reg: got, .. } => assert_eq!(got, reg),
            _ => panic!("expected dense"),
        }
    }

    #[test]
    fn sparse_round_trips_count_and_last() {
        let p = 10u8;
        let mut list = DeltaList::with_capacity(8);
        list.append(5);
        list.append(100);
        list.append(100_000);

        let bytes = marshal_sparse(p, &list);
        let parsed = unmarshal(&bytes).unwrap();
        match parsed {
            HyperLogLogPlus::Sparse { delta_list, .. } => {
                assert_eq!(delta_list.count(), list.count());
                assert_eq!(delta_list.last(), list.last());
            }
            _ => panic!("expected sparse"),
        }
    }

    #[test]
    fn rejects_unknown_version() {
        let mut bytes = marshal_dense(6, &vec![0u8; 64]);
        bytes[1] = 9;
        assert!(matches!(unmarshal(&bytes), Err(HllError::UnknownVersion(9))));
    }

    #[test]
    fn rejects_wrong_sparse_precision() {
        let mut bytes = marshal_dense(6, &vec![0u8; 64]);
        bytes[7] = 24;
        assert!(matches!(
            unmarshal(&bytes),
            Err(HllError::UnexpectedSparsePrecision(24))
        ));
    }

    #[test]
    fn rejects_truncated_header() {
        assert!(matches!(unmarshal(&[1, 2, 3]), Err(HllError::Truncated(3))));
    }
}
