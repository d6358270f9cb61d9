use fpfuncs_math::*;

// Golden tables for the input sweeps used when validating against the NEON
// reference library. Any change here is a numerics change for every model
// quantized against that library.

fn linear(start: i32, step: i32) -> impl Iterator<Item = i32> {
    (0..16).map(move |i| start + step * i)
}

#[test]
fn test_masks_over_small_inputs() {
    let zero_masks: Vec<i32> = linear(-8, 1).map(mask_if_zero).collect();
    let mut expected = vec![0; 16];
    expected[8] = -1;
    assert_eq!(zero_masks, expected);

    let non_zero_masks: Vec<i32> = linear(-8, 1).map(mask_if_non_zero).collect();
    assert_eq!(non_zero_masks, expected.iter().map(|m| !m).collect::<Vec<_>>());
}

#[test]
fn test_power_of_two_ops_determinism() {
    let by_pot = |e: i32| -> Vec<i32> {
        linear(-105_000, 21_000).map(|x| rounding_divide_by_pot(x, e)).collect()
    };
    assert_eq!(by_pot(0), linear(-105_000, 21_000).collect::<Vec<_>>());
    assert_eq!(by_pot(31), vec![0; 16]);
    assert_eq!(
        by_pot(12),
        vec![-26, -21, -15, -10, -5, 0, 5, 10, 15, 21, 26, 31, 36, 41, 46, 51]
    );

    let times_4: Vec<i32> = linear(-105_000, 21_000)
        .map(|x| saturating_rounding_mult_by_pot(x, 2))
        .collect();
    assert_eq!(times_4, linear(-420_000, 84_000).collect::<Vec<_>>());
}

#[test]
fn test_rounding_half_sum_determinism() {
    let step = 21_000_000;
    let got: Vec<i32> = (0..16)
        .map(|i| rounding_half_sum(-step * 5 + step * i, step * 6 - step * 2 * i))
        .collect();
    assert_eq!(got, linear(10_500_000, -10_500_000).collect::<Vec<_>>());
}

#[test]
fn test_exp_restricted_determinism() {
    let got: Vec<i32> = linear(0, -10_000_000).map(exp_restricted).collect();
    assert_eq!(
        got,
        vec![
            2147483156, 2137506489, 2127576159, 2117691952, 2107853657, 2098061059, 2088313949,
            2078612115, 2068955348, 2059343441, 2049776184, 2040253372, 2030774798, 2021340256,
            2011949544, 2002602458,
        ]
    );
}

#[test]
fn test_exp_negative_q0_determinism() {
    let got: Vec<i32> = linear(0, -10_000_000).map(|a| exp_negative(a, 0)).collect();
    assert_eq!(
        got,
        vec![
            2147483647, 2137506489, 2127576159, 2117691952, 2107853657, 2098061059, 2088313949,
            2078612115, 2068955348, 2059343441, 2049776184, 2040253372, 2030774798, 2021340256,
            2011949544, 2002602458,
        ]
    );
}

#[test]
fn test_exp_negative_q5_determinism() {
    let got: Vec<i32> = linear(0, -10_000_000).map(|a| exp_negative(a, 5)).collect();
    assert_eq!(
        got,
        vec![
            2147483647, 1850184102, 1594042935, 1373362266, 1183232752, 1019425192, 878294860,
            756702916, 651944317, 561688559, 483927985, 416932488, 359211969, 309482359,
            266637344, 229723867,
        ]
    );
}

#[test]
fn test_exp_negative_q12_determinism() {
    let got: Vec<i32> = linear(0, -10_000_000).map(|a| exp_negative(a, 12)).collect();
    let mut expected = vec![0; 16];
    expected[0] = i32::MAX;
    expected[1] = 11;
    assert_eq!(got, expected);
}

#[test]
fn test_exp_negative_end_to_end_q5() {
    // exp(0) saturates to the largest Q0 value, the most negative Q5 input
    // (-32.0) underflows to zero.
    assert_eq!(exp_negative(0, 5), i32::MAX);
    assert_eq!(exp_negative(i32::MIN, 5), 0);
    assert_eq!(exp_negative(i32::MIN + 1, 5), 0);

    // Six integer bits is the first format with an explicit clamp.
    let clamp = exp_underflow_threshold(6).unwrap();
    assert_eq!(exp_negative(clamp - 1, 6), 0);
}

#[test]
fn test_one_over_one_plus_x_determinism() {
    let got: Vec<i32> = linear(0, 10_000_000).map(one_over_one_plus_x).collect();
    assert_eq!(
        got,
        vec![
            2147483647, 2137529998, 2127668196, 2117896968, 2108215078, 2098621316, 2089114466,
            2079693360, 2070356846, 2061103786, 2051933072, 2042843598, 2033834300, 2024904114,
            2016052016, 2007276972,
        ]
    );
}
