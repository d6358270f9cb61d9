use fpfuncs_math::{
    exp_negative, exp_restricted, fp_mult, one_over_one_plus_x, rounding_divide_by_pot,
    rounding_half_sum, saturating_rounding_mult_by_pot,
};
use sha2::{Digest, Sha256};

// Hashes a fixed grid of outputs so two builds (or two platforms) can be
// compared with a single line.
fn main() {
    let mut outputs: Vec<i32> = Vec::new();

    for i in 0..256i32 {
        let x = i.wrapping_mul(16_777_259);
        outputs.push(rounding_divide_by_pot(x, i % 32));
        outputs.push(saturating_rounding_mult_by_pot(x, i % 63 - 31));
        outputs.push(rounding_half_sum(x, x.rotate_left(13)));
        outputs.push(fp_mult(x, x.rotate_left(7)));
    }
    for i in 0..256i32 {
        // every 2^21 across [-2^29, 0)
        outputs.push(exp_restricted(-(i + 1) * 2_097_152));
    }
    for integer_bits in [0, 2, 5, 12] {
        for i in 0..256i32 {
            outputs.push(exp_negative(-i * 8_388_593, integer_bits));
        }
    }
    for i in 0..256i32 {
        outputs.push(one_over_one_plus_x(i * 8_388_607));
    }

    let mut hasher = Sha256::new();
    for v in &outputs {
        hasher.update(v.to_le_bytes());
    }
    println!("FPFUNCS_HASH {} ({} values)", hex::encode(hasher.finalize()), outputs.len());
}
