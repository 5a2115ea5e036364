mod common;

use common::{det, det_3d, gt, gt_3d};
use det3deval::data::BBox2D;
use det3deval::overlap::{box3d_overlap, ground_overlap, image_overlap, Criterion, Metric};

fn bbox(x1: f64, y1: f64, x2: f64, y2: f64) -> BBox2D {
    BBox2D { x1, y1, x2, y2 }
}

#[test]
fn image_identical_boxes_full_overlap() -> () {
    let a = bbox(0.0, 0.0, 10.0, 10.0);
    assert!((image_overlap(&a, &a, Criterion::Union) - 1.0).abs() < 1e-12);
}

#[test]
fn image_disjoint_boxes_zero() -> () {
    let a = bbox(0.0, 0.0, 10.0, 10.0);
    let b = bbox(20.0, 0.0, 30.0, 10.0);
    assert_eq!(image_overlap(&a, &b, Criterion::Union), 0.0);
}

#[test]
fn image_touching_boxes_zero() -> () {
    // 只共享一条边，交叠宽度为零
    let a = bbox(0.0, 0.0, 10.0, 10.0);
    let b = bbox(10.0, 0.0, 20.0, 10.0);
    assert_eq!(image_overlap(&a, &b, Criterion::Union), 0.0);
}

#[test]
fn image_criteria_denominators() -> () {
    let a = bbox(0.0, 0.0, 10.0, 10.0);
    let b = bbox(5.0, 0.0, 15.0, 10.0);
    // 交叠 50，a、b 各 100
    assert!((image_overlap(&a, &b, Criterion::Union) - 50.0 / 150.0).abs() < 1e-12);
    assert!((image_overlap(&a, &b, Criterion::RefA) - 0.5).abs() < 1e-12);
    assert!((image_overlap(&a, &b, Criterion::RefB) - 0.5).abs() < 1e-12);
}

#[test]
fn ground_identical_oriented_rectangles_full_overlap() -> () {
    let g = gt_3d("Car", 2.0, 1.0, 10.0, 4.0, 2.0, 1.5, 0.7);
    let d = det_3d("Car", 2.0, 1.0, 10.0, 4.0, 2.0, 1.5, 0.7, 0.9);
    let rst = ground_overlap(&d, &g, Criterion::Union);
    assert!(rst > 0.99 && rst < 1.0 + 1e-6);
}

#[test]
fn ground_disjoint_footprints_zero() -> () {
    let g = gt_3d("Car", 0.0, 0.0, 0.0, 4.0, 2.0, 1.5, 0.0);
    let d = det_3d("Car", 100.0, 0.0, 100.0, 4.0, 2.0, 1.5, 0.0, 0.9);
    assert_eq!(ground_overlap(&d, &g, Criterion::Union), 0.0);
}

#[test]
fn ground_shifted_axis_aligned_overlap() -> () {
    // l=4、w=2，沿 t1 平移 2：交叠 2x2=4，并 8+8-4=12
    let g = gt_3d("Car", 0.0, 0.0, 0.0, 4.0, 2.0, 1.5, 0.0);
    let d = det_3d("Car", 2.0, 0.0, 0.0, 4.0, 2.0, 1.5, 0.0, 0.9);
    let rst = ground_overlap(&d, &g, Criterion::Union);
    assert!((rst - 4.0 / 12.0).abs() < 1e-3);
}

#[test]
fn ground_degenerate_footprint_is_zero_not_nan() -> () {
    let g = gt_3d("Car", 0.0, 0.0, 0.0, 0.0, 0.0, 1.5, 0.0);
    let d = det_3d("Car", 0.0, 0.0, 0.0, 0.0, 0.0, 1.5, 0.0, 0.9);
    let rst = ground_overlap(&d, &g, Criterion::Union);
    assert_eq!(rst, 0.0);
}

#[test]
fn box3d_identical_boxes_full_overlap() -> () {
    let g = gt_3d("Car", 1.0, 0.5, 8.0, 4.0, 2.0, 1.5, 0.3);
    let d = det_3d("Car", 1.0, 0.5, 8.0, 4.0, 2.0, 1.5, 0.3, 0.9);
    let rst = box3d_overlap(&d, &g, Criterion::Union);
    assert!(rst > 0.99 && rst < 1.0 + 1e-6);
}

#[test]
fn box3d_vertically_disjoint_zero() -> () {
    // 脚印一致但竖直区间不相交
    let g = gt_3d("Car", 0.0, 0.0, 0.0, 2.0, 2.0, 1.0, 0.0);
    let d = det_3d("Car", 0.0, 5.0, 0.0, 2.0, 2.0, 1.0, 0.0, 0.9);
    assert_eq!(box3d_overlap(&d, &g, Criterion::Union), 0.0);
}

#[test]
fn box3d_half_height_overlap() -> () {
    // 脚印 2x2，h=2，底面错开 1：交叠体积 4，体积各 8
    let g = gt_3d("Car", 0.0, 0.0, 0.0, 2.0, 2.0, 2.0, 0.0);
    let d = det_3d("Car", 0.0, 1.0, 0.0, 2.0, 2.0, 2.0, 0.0, 0.9);
    let rst = box3d_overlap(&d, &g, Criterion::Union);
    assert!((rst - 4.0 / 12.0).abs() < 1e-3);
}

#[test]
fn metric_dispatch_matches_free_functions() -> () {
    let g = gt("Car", 0.0, 0.0, 10.0, 10.0);
    let d = det("Car", 5.0, 0.0, 15.0, 10.0, 0.9);
    assert_eq!(
        Metric::Image.overlap(&d, &g, Criterion::Union),
        image_overlap(&d.bbox, &g.bbox, Criterion::Union)
    );

    let g = gt_3d("Car", 1.0, 0.5, 8.0, 4.0, 2.0, 1.5, 0.3);
    let d = det_3d("Car", 1.5, 0.5, 8.0, 4.0, 2.0, 1.5, 0.3, 0.9);
    assert_eq!(
        Metric::Ground.overlap(&d, &g, Criterion::Union),
        ground_overlap(&d, &g, Criterion::Union)
    );
    assert_eq!(
        Metric::Box3d.overlap(&d, &g, Criterion::Union),
        box3d_overlap(&d, &g, Criterion::Union)
    );
}
