//! Windows LANGID -> IETF language tag lookup.
//!
//! The MOBI header packs the language as `lang_id | sublang_id << 10`.

/// `(lang_id, sublang_id, tag)`, sorted by `(lang_id, sublang_id)`.
static LANGUAGES: &[(u8, u8, &str)] = &[
    (1, 0, "ar"),
    (1, 1, "ar-sa"),
    (1, 2, "ar-iq"),
    (1, 3, "ar-eg"),
    (1, 4, "ar-ly"),
    (1, 5, "ar-dz"),
    (1, 6, "ar-ma"),
    (1, 7, "ar-tn"),
    (1, 8, "ar-om"),
    (1, 9, "ar-ye"),
    (1, 10, "ar-sy"),
    (1, 11, "ar-jo"),
    (1, 12, "ar-lb"),
    (1, 13, "ar-kw"),
    (1, 14, "ar-ae"),
    (1, 15, "ar-bh"),
    (1, 16, "ar-qa"),
    (2, 0, "bg"),
    (3, 0, "ca"),
    (4, 0, "zh"),
    (4, 1, "zh-tw"),
    (4, 2, "zh-cn"),
    (4, 3, "zh-hk"),
    (4, 4, "zh-sg"),
    (5, 0, "cs"),
    (6, 0, "da"),
    (7, 0, "de"),
    (7, 1, "de"),
    (7, 2, "de-ch"),
    (7, 3, "de-at"),
    (7, 4, "de-lu"),
    (7, 5, "de-li"),
    (8, 0, "el"),
    (9, 0, "en"),
    (9, 1, "en-us"),
    (9, 2, "en-gb"),
    (9, 3, "en-au"),
    (9, 4, "en-ca"),
    (9, 5, "en-nz"),
    (9, 6, "en-ie"),
    (9, 7, "en-za"),
    (9, 8, "en-jm"),
    (9, 11, "en-tt"),
    (9, 12, "en-zw"),
    (9, 13, "en-ph"),
    (9, 40, "en-bz"),
    (10, 0, "es"),
    (10, 4, "es"),
    (10, 8, "es-mx"),
    (10, 16, "es-gt"),
    (10, 20, "es-cr"),
    (10, 24, "es-pa"),
    (10, 28, "es-do"),
    (10, 32, "es-ve"),
    (10, 36, "es-co"),
    (10, 40, "es-pe"),
    (10, 44, "es-ar"),
    (10, 48, "es-ec"),
    (10, 52, "es-cl"),
    (10, 56, "es-uy"),
    (10, 60, "es-py"),
    (10, 64, "es-bo"),
    (10, 68, "es-sv"),
    (10, 72, "es-hn"),
    (10, 76, "es-ni"),
    (10, 80, "es-pr"),
    (11, 0, "fi"),
    (12, 0, "fr"),
    (12, 1, "fr"),
    (12, 2, "fr-be"),
    (12, 3, "fr-ca"),
    (12, 4, "fr-ch"),
    (12, 5, "fr-lu"),
    (12, 6, "fr-mc"),
    (13, 0, "he"),
    (14, 0, "hu"),
    (15, 0, "is"),
    (16, 0, "it"),
    (16, 1, "it"),
    (16, 2, "it-ch"),
    (17, 0, "ja"),
    (18, 0, "ko"),
    (19, 0, "nl"),
    (19, 1, "nl"),
    (19, 2, "nl-be"),
    (20, 0, "no"),
    (21, 0, "pl"),
    (22, 0, "pt"),
    (22, 1, "pt-br"),
    (22, 2, "pt"),
    (23, 0, "rm"),
    (24, 0, "ro"),
    (25, 0, "ru"),
    (26, 0, "hr"),
    (26, 3, "sr"),
    (27, 0, "sk"),
    (28, 0, "sq"),
    (29, 0, "sv"),
    (29, 1, "sv"),
    (29, 8, "sv-fi"),
    (30, 0, "th"),
    (31, 0, "tr"),
    (32, 0, "ur"),
    (33, 0, "id"),
    (34, 0, "uk"),
    (35, 0, "be"),
    (36, 0, "sl"),
    (37, 0, "et"),
    (38, 0, "lv"),
    (39, 0, "lt"),
    (41, 0, "fa"),
    (42, 0, "vi"),
    (43, 0, "hy"),
    (44, 0, "az"),
    (45, 0, "eu"),
    (46, 0, "sb"),
    (47, 0, "mk"),
    (48, 0, "sx"),
    (49, 0, "ts"),
    (50, 0, "tn"),
    (52, 0, "xh"),
    (53, 0, "zu"),
    (54, 0, "af"),
    (55, 0, "ka"),
    (56, 0, "fo"),
    (57, 0, "hi"),
    (58, 0, "mt"),
    (59, 0, "sz"),
    (62, 0, "ms"),
    (63, 0, "kk"),
    (65, 0, "sw"),
    (67, 0, "uz"),
    (67, 2, "uz"),
    (68, 0, "tt"),
    (69, 0, "bn"),
    (70, 0, "pa"),
    (71, 0, "gu"),
    (72, 0, "or"),
    (73, 0, "ta"),
    (74, 0, "te"),
    (75, 0, "kn"),
    (76, 0, "ml"),
    (77, 0, "as"),
    (78, 0, "mr"),
    (79, 0, "sa"),
    (87, 0, "x-kok"),
    (97, 0, "ne"),
];

/// Split a packed MOBI language code into `(lang_id, sublang_id)`.
pub fn unpack_language_code(code: u32) -> (u8, u8) {
    ((code & 0xFF) as u8, ((code >> 10) & 0xFF) as u8)
}

/// Resolve a LANGID pair to a language tag.
///
/// An unknown sublanguage falls back to the base language. Unknown or
/// neutral (0) language ids resolve to `None`.
pub fn language_tag(lang_id: u8, sublang_id: u8) -> Option<&'static str> {
    let find = |sub: u8| {
        LANGUAGES
            .binary_search_by_key(&(lang_id, sub), |&(l, s, _)| (l, s))
            .ok()
            .map(|idx| LANGUAGES[idx].2)
    };
    find(sublang_id).or_else(|| find(0))
}

/// Resolve a packed header language code.
pub fn language_from_code(code: u32) -> Option<&'static str> {
    let (lang_id, sublang_id) = unpack_language_code(code);
    language_tag(lang_id, sublang_id)
}
