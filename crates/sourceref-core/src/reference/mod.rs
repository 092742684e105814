mod normalize;
mod route;

pub use normalize::{base_name, extension, normalize_ref, strip_diff_prefix, to_forward_slashes};
pub use route::{
    is_object_uri, is_structured_object_ref, language_for_extension, route_ref,
    workspace_language, RefKind, RefRoute, OBJECT_FILE_SUFFIX, OBJECT_LANGUAGE,
    OBJECT_URI_PREFIX, PLAINTEXT_LANGUAGE,
};
