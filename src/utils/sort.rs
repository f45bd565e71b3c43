use std::cmp::Ordering;

/// Stable u32-key radix sort for SoA (inds/vals).
/// - Sorts by inds ascending
/// - Reorders vals accordingly
/// - Equal keys keep their input order
///
/// Complexity: 4 passes, each O(n + 256)
#[inline]
pub fn radix_sort_u32_soa<N: Copy>(inds: &mut [u32], vals: &mut [N]) {
    assert_eq!(inds.len(), vals.len());
    let n = inds.len();
    if n <= 1 {
        return;
    }

    // 小さい入力は挿入ソートの方が速い
    if n <= 32 {
        insertion_sort_u32_soa(inds, vals);
        return;
    }

    let mut src_inds = inds.to_vec();
    let mut src_vals = vals.to_vec();
    let mut dst_inds = vec![0u32; n];
    let mut dst_vals = src_vals.clone();

    // 4 passes: byte 0..3 (LSD)
    for shift in [0u32, 8, 16, 24] {
        let mut count = [0usize; 256];
        for &k in src_inds.iter() {
            count[((k >> shift) & 0xFF) as usize] += 1;
        }

        // skip a pass where every key shares the same byte
        if count.iter().any(|&c| c == n) {
            continue;
        }

        let mut sum = 0usize;
        for c in count.iter_mut() {
            let tmp = *c;
            *c = sum;
            sum += tmp;
        }

        for idx in 0..n {
            let k = src_inds[idx];
            let b = ((k >> shift) & 0xFF) as usize;
            let pos = count[b];
            dst_inds[pos] = k;
            dst_vals[pos] = src_vals[idx];
            count[b] += 1;
        }

        std::mem::swap(&mut src_inds, &mut dst_inds);
        std::mem::swap(&mut src_vals, &mut dst_vals);
    }

    inds.copy_from_slice(&src_inds);
    vals.copy_from_slice(&src_vals);
}

#[inline]
fn insertion_sort_u32_soa<N: Copy>(inds: &mut [u32], vals: &mut [N]) {
    for i in 1..inds.len() {
        let key = inds[i];
        let val = vals[i];
        let mut j = i;
        while j > 0 && inds[j - 1] > key {
            inds[j] = inds[j - 1];
            vals[j] = vals[j - 1];
            j -= 1;
        }
        inds[j] = key;
        vals[j] = val;
    }
}

/// Ranking order: score descending, then index ascending.
/// NaN sorts after every finite score.
#[inline]
pub fn rank_order(a: (usize, f64), b: (usize, f64)) -> Ordering {
    match (a.1.is_nan(), b.1.is_nan()) {
        (true, true) => a.0.cmp(&b.0),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)),
    }
}
