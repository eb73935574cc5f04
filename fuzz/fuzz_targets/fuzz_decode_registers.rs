#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Interpret the input as u16 register stream in big-endian pairs
    let regs: Vec<u16> = data
        .chunks_exact(2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .collect();

    // Every descriptor must reject short input instead of panicking
    for reg in enovates::registers::ALL {
        let _ = reg.decode_scaled(&regs);
    }
    if let Some(&raw) = regs.first() {
        let _ = enovates::driver::decode_status(u32::from(raw));
    }
});
