use std::collections::HashSet;

use approx::assert_relative_eq;
use fftcheck::{
    buffer_size, compute_input, compute_stride, copy_buffers, count_iters, distance,
    impose_hermitian_symmetry, norm, partition_col_major, partition_row_major, set_input,
    ArrayType, BufferLayout, ElementReader, ElementWriter, HostBuffer, ParallelConfig, Partition,
    Placement, Precision, TransformKind, TransformLayout, TransformParams,
};

fn layout_for(length: &[usize], kind: TransformKind, placement: Placement) -> TransformLayout {
    TransformLayout::new(TransformParams {
        length: length.to_vec(),
        istride: vec![1],
        ostride: vec![1],
        kind,
        placement,
        ..TransformParams::default()
    })
    .unwrap()
}

fn covered<const N: usize>(parts: &[Partition<N>]) -> (usize, usize) {
    let mut seen = HashSet::new();
    let mut total = 0;
    for p in parts {
        for index in p.iter() {
            seen.insert(index);
            total += 1;
        }
    }
    (seen.len(), total)
}

#[test]
fn test_plane_counts() {
    for ty in ArrayType::ALL {
        let sizes = buffer_size(ty, &[8], &[1], 1, 8, &[0, 0]);
        let expected = if ty.is_planar() { 2 } else { 1 };
        assert_eq!(sizes.len(), expected, "{ty}");
    }
    assert!(buffer_size(ArrayType::Unset, &[8], &[1], 1, 8, &[0, 0]).is_empty());
}

#[test]
fn test_contiguous_strides() {
    assert_eq!(compute_stride(&[4, 5, 6], &[], false).unwrap(), vec![30, 6, 1]);
}

#[test]
fn test_partitions_cover_box_exactly() {
    for parts in [1, 2, 3, 8] {
        let (unique, total) = covered(&partition_row_major(&[37], parts));
        assert_eq!((unique, total), (37, 37));

        let (unique, total) = covered(&partition_row_major(&[9, 11], parts));
        assert_eq!((unique, total), (99, 99));
        let (unique, total) = covered(&partition_col_major(&[9, 11], parts));
        assert_eq!((unique, total), (99, 99));

        let length = [5, 4, 7];
        let (unique, total) = covered(&partition_row_major(&length, parts));
        assert_eq!((unique, total), (count_iters(&length), count_iters(&length)));
        let (unique, total) = covered(&partition_col_major(&length, parts));
        assert_eq!((unique, total), (count_iters(&length), count_iters(&length)));
    }
}

#[test]
fn test_scenario_complex_1d_single() {
    let layout = TransformLayout::new(TransformParams {
        length: vec![8],
        istride: vec![1],
        nbatch: 1,
        precision: Precision::Single,
        kind: TransformKind::ComplexForward,
        itype: ArrayType::ComplexInterleaved,
        otype: ArrayType::ComplexInterleaved,
        ..TransformParams::default()
    })
    .unwrap();
    assert_eq!(layout.ilength(), vec![8]);
    assert_eq!(layout.olength(), vec![8]);
    assert_eq!(layout.isize(), &[8]);
    assert_eq!(layout.osize(), &[8]);
    assert_eq!(layout.idist(), 8);
    assert_eq!(layout.odist(), 8);
    assert!(layout.valid());
}

#[test]
fn test_scenario_real_forward_out_of_place() {
    let layout = layout_for(&[8], TransformKind::RealForward, Placement::OutOfPlace);
    assert_eq!(layout.olength(), vec![5]);
    assert_eq!(layout.odist(), 5);
    assert_eq!(layout.itype(), ArrayType::Real);
    assert_eq!(layout.otype(), ArrayType::HermitianInterleaved);
}

#[test]
fn test_scenario_real_forward_in_place() {
    let layout = layout_for(&[8], TransformKind::RealForward, Placement::InPlace);
    assert_eq!(layout.idist(), 10);
    assert!(layout.valid());
}

#[test]
fn test_interleaved_planar_round_trip() {
    let cases: [(&[usize], &[usize], &[usize], usize); 3] = [
        (&[33], &[3], &[2], 2),
        (&[10, 12], &[13, 1], &[1, 10], 3),
        (&[4, 6, 5], &[64, 8, 1], &[1, 4, 24], 2),
    ];
    for (length, istride, pstride, nbatch) in cases {
        let ci = BufferLayout {
            precision: Precision::Single,
            array_type: ArrayType::ComplexInterleaved,
            length: length.to_vec(),
            stride: istride.to_vec(),
            dist: length.iter().zip(istride).map(|(l, s)| l * s).max().unwrap() + 1,
            nbatch,
            offset: vec![3],
        };
        let cp = BufferLayout {
            array_type: ArrayType::ComplexPlanar,
            stride: pstride.to_vec(),
            dist: length.iter().zip(pstride).map(|(l, s)| l * s).max().unwrap(),
            offset: vec![1, 4],
            ..ci.clone()
        };
        let config = ParallelConfig::default();

        let mut input = ci.allocate().unwrap();
        set_input(&mut input, &ci, &config).unwrap();

        let mut planar = cp.allocate().unwrap();
        copy_buffers(&input, &ci, &mut planar, &cp, &config).unwrap();
        let mut back = ci.allocate().unwrap();
        copy_buffers(&planar, &cp, &mut back, &ci, &config).unwrap();
        assert_eq!(back, input, "length {length:?}");
    }
}

#[test]
fn test_distance_to_self_is_zero() {
    let layout = layout_for(&[12, 10], TransformKind::ComplexInverse, Placement::OutOfPlace);
    let input = compute_input(&layout, &ParallelConfig::default()).unwrap();
    let ilayout = layout.input_layout();
    let d = distance(&input, &ilayout, &input, &ilayout, 0.0, &ParallelConfig::default()).unwrap();
    assert_eq!(d.norms.l2, 0.0);
    assert_eq!(d.norms.linf, 0.0);
    assert!(d.failures.is_empty());
}

#[test]
fn test_relative_error_against_reference() {
    let layout =
        BufferLayout::contiguous(Precision::Double, ArrayType::ComplexInterleaved, &[64], 1)
            .unwrap();
    let config = ParallelConfig::sequential();
    let mut reference = layout.allocate().unwrap();
    set_input(&mut reference, &layout, &config).unwrap();

    // Perturb every element by the same relative amount.
    let mut perturbed = layout.allocate().unwrap();
    {
        let src = ElementReader::<f64>::new(&reference, &layout).unwrap();
        let dst = ElementWriter::<f64>::new(&mut perturbed, &layout).unwrap();
        for i in 0..64 {
            unsafe { dst.write(i, src.read(i) * 1.001) };
        }
    }

    let d = distance(&reference, &layout, &perturbed, &layout, 1.0, &config).unwrap();
    let n = norm(&reference, &layout, &config).unwrap();
    assert_relative_eq!(d.norms.l2 / n.l2, 1e-3, max_relative = 1e-6);
    assert!(d.norms.linf / n.linf <= 1e-3 * (1.0 + 1e-9));
    assert!(d.failures.is_empty());
}

#[test]
fn test_hermitian_symmetry_idempotent() {
    for length in [vec![16], vec![6, 10], vec![4, 5, 6]] {
        let layout = layout_for(&length, TransformKind::RealInverse, Placement::OutOfPlace);
        let ilayout = layout.input_layout();
        let mut once = compute_input(&layout, &ParallelConfig::default()).unwrap();
        let reference = once.clone();
        impose_hermitian_symmetry(&mut once, &ilayout, layout.length()).unwrap();
        assert_eq!(once, reference, "length {length:?}");
    }
}

#[test]
fn test_generation_is_deterministic() {
    let layout = layout_for(&[40, 60], TransformKind::RealForward, Placement::InPlace);
    let a = compute_input(&layout, &ParallelConfig::sequential()).unwrap();
    let b = compute_input(&layout, &ParallelConfig::sequential()).unwrap();
    let c = compute_input(&layout, &ParallelConfig::default().with_workers(8)).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, c);
}

#[test]
fn test_generated_element_depends_on_index_only() {
    // The same flat index yields the same value in differently shaped buffers.
    let small = BufferLayout::contiguous(Precision::Double, ArrayType::Real, &[10], 1).unwrap();
    let large = BufferLayout::contiguous(Precision::Double, ArrayType::Real, &[5, 20], 1).unwrap();
    let mut a = small.allocate().unwrap();
    let mut b = large.allocate().unwrap();
    set_input(&mut a, &small, &ParallelConfig::sequential()).unwrap();
    set_input(&mut b, &large, &ParallelConfig::default()).unwrap();
    for i in 0..10 {
        assert_eq!(a.read::<f64>(0, i), b.read::<f64>(0, i));
    }
}

#[test]
fn test_short_buffer_is_rejected() {
    let layout = BufferLayout::contiguous(Precision::Single, ArrayType::Real, &[16], 2).unwrap();
    let mut buf = HostBuffer::zeroed(&[16 * 4]);
    assert!(set_input(&mut buf, &layout, &ParallelConfig::default()).is_err());
    let planar =
        BufferLayout::contiguous(Precision::Single, ArrayType::ComplexPlanar, &[4], 1).unwrap();
    let one_plane = HostBuffer::zeroed(&[16]);
    assert!(norm(&one_plane, &planar, &ParallelConfig::default()).is_err());
}
