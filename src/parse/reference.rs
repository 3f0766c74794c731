use crate::diag::AttributeKind;

use super::VertexKey;

/// A face corner as written in the source, before index resolution.
///
/// Indices are the raw OBJ values: 1-based when positive, relative to the end of the attribute
/// stream when negative. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawReference {
    pub(crate) position: i64,
    pub(crate) texcoord: Option<i64>,
    pub(crate) normal: Option<i64>,
}

/// Parse a reference of the form `pos`, `pos/uv`, `pos//normal`, or `pos/uv/normal`.
///
/// Returns `None` if the position field is missing, any field isn't an integer, any index is
/// zero, or there are more than three fields.
pub(crate) fn parse_reference(token: &str) -> Option<RawReference> {
    let mut fields = token.split('/');
    let position = parse_index(fields.next()?)?;
    let texcoord = parse_optional_index(fields.next())?;
    let normal = parse_optional_index(fields.next())?;
    if fields.next().is_some() {
        return None;
    }
    Some(RawReference {
        position,
        texcoord,
        normal,
    })
}

fn parse_index(field: &str) -> Option<i64> {
    match field.parse::<i64>() {
        Ok(0) | Err(_) => None,
        Ok(n) => Some(n),
    }
}

/// `Some(None)` for an absent or empty field, `None` for a malformed one.
fn parse_optional_index(field: Option<&str>) -> Option<Option<i64>> {
    match field {
        None | Some("") => Some(None),
        Some(f) => parse_index(f).map(Some),
    }
}

/// Resolve an OBJ index against the number of elements of its stream declared so far.
///
/// The result may still be `>= count` for positive indices; only underflow of a relative index
/// is reported here, as `None`.
#[inline]
pub(crate) fn resolve_index(index: i64, count: usize) -> Option<usize> {
    if index > 0 {
        usize::try_from(index - 1).ok()
    } else {
        let resolved = i64::try_from(count).ok()? + index;
        usize::try_from(resolved).ok()
    }
}

/// A reference whose position could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Unresolved {
    pub(crate) attribute: AttributeKind,
    pub(crate) index: i64,
    pub(crate) count: usize,
}

/// Counts of each attribute stream at the point a face is read.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StreamCounts {
    /// Positions in the whole input, including those declared after the face.
    pub(crate) total_positions: usize,
    pub(crate) positions: usize,
    pub(crate) texcoords: usize,
    pub(crate) normals: usize,
}

impl RawReference {
    /// Resolve into a [VertexKey].
    ///
    /// A positive position must name an element of the whole input; a relative one must name an
    /// element declared before the face. A texcoord or normal that underflows is reported through
    /// `on_underflow` and treated as absent; one that overflows is left for the welder to
    /// substitute.
    pub(crate) fn resolve(
        self,
        counts: StreamCounts,
        mut on_underflow: impl FnMut(Unresolved),
    ) -> Result<VertexKey, Unresolved> {
        let limit = if self.position > 0 {
            counts.total_positions
        } else {
            counts.positions
        };
        let position = resolve_index(self.position, counts.positions)
            .filter(|&p| p < limit)
            .ok_or(Unresolved {
                attribute: AttributeKind::Position,
                index: self.position,
                count: limit,
            })?;

        let mut optional = |index: Option<i64>, attribute, count| {
            let index = index?;
            let resolved = resolve_index(index, count);
            if resolved.is_none() {
                on_underflow(Unresolved {
                    attribute,
                    index,
                    count,
                });
            }
            resolved
        };

        let texcoord = optional(self.texcoord, AttributeKind::Texcoord, counts.texcoords);
        let normal = optional(self.normal, AttributeKind::Normal, counts.normals);

        Ok(VertexKey {
            position,
            texcoord,
            normal,
        })
    }
}
