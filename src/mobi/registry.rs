//! Canonical EXTH type-id registry.
//!
//! One table covers every record type the decoder knows by name. Each entry
//! names the metadata field the record lands in and how its payload is
//! rendered when no dedicated handler exists in the EXTH decoder.

/// How a generic EXTH payload is rendered into a string value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Text in the header codec.
    Text,
    /// Big-endian u32, rendered in decimal.
    Number,
    /// Opaque bytes, rendered as lowercase hex.
    Hex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExthField {
    pub id: u32,
    pub name: &'static str,
    pub kind: ValueKind,
}

const fn text(id: u32, name: &'static str) -> ExthField {
    ExthField { id, name, kind: ValueKind::Text }
}

const fn number(id: u32, name: &'static str) -> ExthField {
    ExthField { id, name, kind: ValueKind::Number }
}

const fn hex(id: u32, name: &'static str) -> ExthField {
    ExthField { id, name, kind: ValueKind::Hex }
}

/// Well-known EXTH record types, sorted by id.
pub static EXTH_FIELDS: &[ExthField] = &[
    text(1, "drm_server_id"),
    text(2, "drm_commerce_id"),
    text(3, "drm_ebookbase_book_id"),
    text(4, "drm_ebookbase_dep_id"),
    text(100, "author"),
    text(101, "publisher"),
    text(102, "imprint"),
    text(103, "description"),
    text(104, "isbn"),
    text(105, "subject"),
    text(106, "pubdate"),
    text(107, "review"),
    text(108, "book_producer"),
    text(109, "rights"),
    text(110, "subject_code"),
    text(111, "type"),
    text(112, "source"),
    text(113, "mobi-asin"),
    text(114, "version_number"),
    number(115, "sample"),
    number(116, "start_reading"),
    text(117, "adult"),
    text(118, "retail_price"),
    text(119, "retail_currency"),
    text(120, "tsc"),
    number(121, "kf8_header_index"),
    text(122, "fixed_layout"),
    text(123, "book_type"),
    text(124, "orientation_lock"),
    number(125, "resource_count"),
    text(126, "original_resolution"),
    text(127, "zero_gutter"),
    text(128, "zero_margin"),
    text(129, "kf8_cover_uri"),
    number(130, "offline_sample"),
    number(131, "metadata_record_offset"),
    text(132, "region_magnification"),
    text(150, "lending_enabled"),
    text(200, "dictionary_short_name"),
    number(201, "cover_offset"),
    number(202, "thumbnail_offset"),
    number(203, "has_fake_cover"),
    number(204, "creator_software"),
    number(205, "creator_major_version"),
    number(206, "creator_minor_version"),
    number(207, "creator_build_number"),
    hex(208, "watermark"),
    hex(209, "tamper_proof_keys"),
    hex(300, "font_signature"),
    number(401, "clipping_limit"),
    number(402, "publisher_limit"),
    hex(403, "unknown_403"),
    number(404, "tts_disabled"),
    hex(405, "ownership_type"),
    number(406, "rental_expiration_time"),
    hex(407, "unknown_407"),
    hex(420, "multimedia_content_reference"),
    hex(450, "locations_match"),
    hex(451, "full_story_length"),
    hex(452, "sample_start_location"),
    hex(453, "sample_end_location"),
    text(501, "cdetype"),
    text(502, "last_update_time"),
    text(503, "title"),
    text(504, "cde_content_key"),
    text(505, "amazon_content_reference"),
    text(506, "title_language"),
    text(507, "title_display_direction"),
    text(508, "title_pronunciation"),
    text(509, "title_collation"),
    text(510, "secondary_title"),
    text(511, "secondary_title_language"),
    text(512, "secondary_title_direction"),
    text(513, "secondary_title_pronunciation"),
    text(514, "secondary_title_collation"),
    text(515, "author_language"),
    text(516, "author_display_direction"),
    text(517, "author_pronunciation"),
    text(518, "author_collation"),
    text(519, "author_type"),
    text(520, "publisher_language"),
    text(521, "publisher_display_direction"),
    text(522, "publisher_pronunciation"),
    text(523, "publisher_collation"),
    text(524, "language"),
    text(525, "primary_writing_mode"),
    text(526, "ncx_ingested_by_software"),
    text(527, "page_progression_direction"),
    text(528, "override_kindle_fonts"),
    text(529, "compression_upgraded"),
    text(530, "soft_hyphens_in_content"),
    text(531, "dictionary_in_language"),
    text(532, "dictionary_out_language"),
    text(533, "font_converted"),
    text(534, "amazon_creator_info"),
    text(535, "creator_build_tag"),
    text(536, "hd_media_containers_info"),
    text(538, "resource_container_fidelity"),
    text(539, "hd_container_mimetype"),
    text(540, "sample_for_special_purpose"),
    text(541, "kindletool_operation_information"),
    text(542, "container_id"),
    text(543, "asset_type"),
    text(544, "unknown_544"),
    text(547, "in_memory"),
];

/// Look up a record type by id.
pub fn lookup(id: u32) -> Option<&'static ExthField> {
    EXTH_FIELDS
        .binary_search_by_key(&id, |f| f.id)
        .ok()
        .map(|idx| &EXTH_FIELDS[idx])
}
