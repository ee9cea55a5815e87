/// Per-cell deterministic seed: mixes the cell coordinate and world
/// seed through distinct large odd multipliers, then a splitmix-style
/// avalanche. Order-sensitive, so (a, b) and (b, a) decorrelate, and
/// adjacent cells produce unrelated sequences.
pub fn cell_seed(cx: i32, cz: i32, world_seed: i32) -> u64 {
    let mut h = (cx as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (cz as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
        ^ (world_seed as u64).wrapping_mul(0x2545_F491_4F6C_DD1D);
    h ^= h >> 30;
    h = h.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    h ^= h >> 27;
    h = h.wrapping_mul(0x94D0_49BB_1331_11EB);
    h ^= h >> 31;
    h
}
