//! Fixed element and attribute classification tables.
//!
//! All tables are matched on the already-normalized name (see [`normalize_tag_name`]),
//! so lookups are plain string comparisons with no allocation.

use std::borrow::Cow;

/// Elements that never have children and never produce a `close` event.
pub fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "basefont"
            | "br"
            | "col"
            | "embed"
            | "frame"
            | "hr"
            | "img"
            | "input"
            | "isindex"
            | "keygen"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Elements implicitly closed when a start tag of the same name is opened directly
/// inside them (`<li>a<li>b`).
pub fn closes_self(name: &str) -> bool {
    matches!(
        name,
        "colgroup" | "dd" | "dt" | "li" | "options" | "p" | "td" | "tfoot" | "th" | "thead" | "tr"
    )
}

/// Elements whose content is captured verbatim up to the matching end tag.
pub fn is_raw_text_element(name: &str) -> bool {
    name == "script"
}

/// Element names whose case is significant (SVG heritage).
pub fn is_case_sensitive_element(name: &str) -> bool {
    matches!(
        name,
        "altGlyph"
            | "altGlyphDef"
            | "altGlyphItem"
            | "animateColor"
            | "animateMotion"
            | "animateTransform"
            | "clipPath"
            | "feBlend"
            | "feColorMatrix"
            | "feComponentTransfer"
            | "feComposite"
            | "feConvolveMatrix"
            | "feDiffuseLighting"
            | "feDisplacementMap"
            | "feDistantLight"
            | "feFlood"
            | "feFuncA"
            | "feFuncB"
            | "feFuncG"
            | "feFuncR"
            | "feGaussianBlur"
            | "feImage"
            | "feMerge"
            | "feMergeNode"
            | "feMorphology"
            | "feOffset"
            | "fePointLight"
            | "feSpecularLighting"
            | "feSpotLight"
            | "feTile"
            | "feTurbulence"
            | "foreignObject"
            | "glyphRef"
            | "linearGradient"
            | "radialGradient"
            | "textPath"
    )
}

/// Attribute names whose case is significant (SVG heritage). The attribute name
/// codec passes these through untouched in both directions.
pub fn is_case_sensitive_attribute(name: &str) -> bool {
    matches!(
        name,
        "allowReorder"
            | "attributeName"
            | "attributeType"
            | "autoReverse"
            | "baseFrequency"
            | "baseProfile"
            | "calcMode"
            | "clipPathUnits"
            | "contentScriptType"
            | "contentStyleType"
            | "controlsList"
            | "diffuseConstant"
            | "edgeMode"
            | "externalResourcesRequired"
            | "filterRes"
            | "filterUnits"
            | "glyphRef"
            | "gradientTransform"
            | "gradientUnits"
            | "kernelMatrix"
            | "kernelUnitLength"
            | "keyPoints"
            | "keySplines"
            | "keyTimes"
            | "lengthAdjust"
            | "limitingConeAngle"
            | "markerHeight"
            | "markerUnits"
            | "markerWidth"
            | "maskContentUnits"
            | "maskUnits"
            | "patternContentUnits"
            | "patternTransform"
            | "patternUnits"
            | "pointsAtX"
            | "pointsAtY"
            | "pointsAtZ"
            | "preserveAlpha"
            | "preserveAspectRatio"
            | "primitiveUnits"
            | "repeatCount"
            | "repeatDur"
            | "requiredExtensions"
            | "requiredFeatures"
            | "specularConstant"
            | "specularExponent"
            | "spreadMethod"
            | "startOffset"
            | "stdDeviation"
            | "stitchTiles"
            | "surfaceScale"
            | "systemLanguage"
            | "tableValues"
            | "textLength"
            | "viewBox"
            | "viewTarget"
            | "xChannelSelector"
            | "yChannelSelector"
    )
}

/// Applies the case-sensitivity rule to an element name.
///
/// Canonicalization policy: names on the case-sensitive list are kept verbatim,
/// everything else is ASCII-folded (`A-Z` -> `a-z`, non-ASCII untouched). Borrows
/// when the name is already canonical.
pub fn normalize_tag_name(raw: &str) -> Cow<'_, str> {
    if is_case_sensitive_element(raw) || !raw.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Borrowed(raw)
    } else {
        Cow::Owned(raw.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_borrows_when_already_lowercase() {
        assert!(matches!(normalize_tag_name("div"), Cow::Borrowed("div")));
        assert!(matches!(normalize_tag_name("my-widget"), Cow::Borrowed(_)));
    }

    #[test]
    fn normalize_folds_ascii_case() {
        assert_eq!(normalize_tag_name("DiV"), "div");
        assert_eq!(normalize_tag_name("LI"), "li");
    }

    #[test]
    fn normalize_keeps_svg_camel_case() {
        assert!(matches!(normalize_tag_name("clipPath"), Cow::Borrowed("clipPath")));
        assert_eq!(normalize_tag_name("foreignObject"), "foreignObject");
        // Only the exact spelling is protected.
        assert_eq!(normalize_tag_name("CLIPPATH"), "clippath");
    }

    #[test]
    fn classification_tables_are_disjoint_where_it_matters() {
        for name in ["li", "p", "td", "tr", "dd", "dt"] {
            assert!(closes_self(name), "{name} should close itself");
            assert!(!is_void_element(name), "{name} must not be void");
        }
        for name in ["br", "img", "input", "hr", "meta", "link"] {
            assert!(is_void_element(name), "{name} should be void");
        }
        assert!(is_raw_text_element("script"));
        assert!(!is_raw_text_element("style"));
        assert!(is_case_sensitive_attribute("viewBox"));
        assert!(!is_case_sensitive_attribute("viewbox"));
    }
}
