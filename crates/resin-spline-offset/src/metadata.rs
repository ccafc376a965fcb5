//! Copies spline metadata onto a generated result.

use rhizome_resin_scene::SceneObject;

/// Copies sampling settings, the closed snapshot and tags from `source` to `dest`.
///
/// Sampling settings come from the resolved form of `source`, so procedural
/// splines report the settings they would generate with. `closed` is applied
/// as given rather than read from `source`. Tags are appended in order.
///
/// Returns `false` if the settings could not be copied because `source` has
/// no concrete spline form or `dest` is not a spline. The closed flag and tags
/// are still applied where possible.
pub fn propagate_metadata(source: &SceneObject, dest: &mut SceneObject, closed: bool) -> bool {
    let params = source.real_spline().map(|spline| spline.params);

    let copied = match (dest.as_spline_mut(), params) {
        (Some(spline), Some(params)) => {
            spline.params = params;
            true
        }
        _ => false,
    };

    if let Some(spline) = dest.as_spline_mut() {
        spline.set_closed(closed);
    }
    dest.tags.extend(source.tags.iter().cloned());

    copied
}
