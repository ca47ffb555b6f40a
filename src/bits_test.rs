use crate::bits::*;

#[test]
fn clz32_zero_is_bit_width() {
    assert_eq!(clz32(0), 32);
}

#[test]
fn clz64_zero_is_bit_width() {
    assert_eq!(clz64(0), 64);
}

#[test]
fn clz32_matches_known_values() {
    assert_eq!(clz32(1), 31);
    assert_eq!(clz32(0x8000_0000), 0);
    assert_eq!(clz32(0x0000_00ff), 24);
}

#[test]
fn eb32_extracts_middle_bit_field() {
    let x = 0b1011_0110u32;
    assert_eq!(eb32(x, 8, 4), 0b1011);
    assert_eq!(eb32(x, 4, 0), 0b0110);
}

#[test]
fn eb64_extracts_top_bits() {
    let x: u64 = 0xff00_0000_0000_0000;
    assert_eq!(eb64(x, 64, 56), 0xff);
}

#[test]
fn divide_by_8_round_up_handles_exact_and_remainder() {
    assert_eq!(divide_by_8_round_up(16), 2);
    assert_eq!(divide_by_8_round_up(17), 3);
    assert_eq!(divide_by_8_round_up(0), 0);
}

#[test]
fn calc_position_matches_bit_arithmetic() {
    assert_eq!(calc_position(0, 6), (0, 0));
    assert_eq!(calc_position(1, 6), (0, 6));
    assert_eq!(calc_position(4, 6), (3, 0));
}

#[test]
fn write_then_read_bits_round_trips_across_byte_boundary() {
    let mut buf = vec![0u8; 4];
    for reg_num in 0..5u32 {
        let (idx, pos) = calc_position(reg_num, 6);
        write_u8_bits(&mut buf, idx, pos, (reg_num * 7) as u8 & 0x3f, 6);
    }
    for reg_num in 0..5u32 {
        let (idx, pos) = calc_position(reg_num, 6);
        let got = read_u8_bits(&buf, idx, pos, 6);
        assert_eq!(got, (reg_num * 7) as u8 & 0x3f, "register {reg_num}");
    }
}

#[test]
fn write_then_read_bits_at_width_4_and_5() {
    for width in [4u8, 5u8] {
        let mut buf = vec![0u8; 8];
        let values: Vec<u8> = (0..10).map(|i| (i * 3) as u8 % (1 << width)).collect();
        for (i, &v) in values.iter().enumerate() {
            let (idx, pos) = calc_position(i as u32, width);
            write_u8_bits(&mut buf, idx, pos, v, width);
        }
        for (i, &v) in values.iter().enumerate() {
            let (idx, pos) = calc_position(i as u32, width);
            assert_eq!(read_u8_bits(&buf, idx, pos, width), v);
        }
    }
}
