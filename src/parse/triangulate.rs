/// Split a convex polygon into a triangle fan anchored at its first corner.
///
/// A polygon `[r0, r1, …, rk]` yields `(r0, r[i], r[i+1])` for `i ∈ 1..k`, preserving winding.
/// Polygons with fewer than three corners yield nothing.
///
/// Non-convex or non-planar polygons are triangulated the same way, which may produce
/// overlapping triangles.
pub fn triangulate_fan<T: Copy>(polygon: &[T]) -> impl Iterator<Item = [T; 3]> + '_ {
    let anchor = polygon.first().copied();
    polygon
        .windows(2)
        .skip(1)
        .filter_map(move |edge| anchor.map(|a| [a, edge[0], edge[1]]))
}
