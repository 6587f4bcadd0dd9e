//! Small compressed gazetteer shared by the unit tests.
//!
//! Krabi / Khlong Thom (3 sub-districts), Bangkok (3 districts with one
//! sub-district each) and Nonthaburi / Pak Kret (2 sub-districts), with
//! both word tables compressed the same way the published data files are.

use crate::decoder::{CompressedWordTable, WordEntry};
use crate::expander::{DistrictNode, GeoSlot, ProvinceNode, SubDistrictNode};
use crate::store::Generation;
use crate::types::Language;
use std::path::Path;

fn entries(indexed: &[(usize, usize)], literals: &[&str]) -> Vec<WordEntry> {
    let mut data: Vec<WordEntry> = literals
        .iter()
        .map(|text| WordEntry::Literal(text.to_string()))
        .collect();
    for &(position, index) in indexed {
        data[position] = WordEntry::Index(index);
    }
    data
}

pub fn thai_table() -> CompressedWordTable {
    CompressedWordTable {
        data: entries(
            &[(0, 0), (11, 1)],
            &[
                "", "AB", "ABD", "ABE", "AF", "กรุงเทพมหานคร", "ปทุมวัน", "ลุมพินี", "สาทร",
                "ทุ่งมหาเมฆ", "นนทบุรี", "", "Gตลาด", "Gรัก", "สีลม",
            ],
        ),
        lookup: Some("C|ปากเกร็ด".to_string()),
        words: Some("คลอง|ท่อม|กระบี่|เหนือ|ใต้|พน|บาง".to_string()),
    }
}

pub fn english_table() -> CompressedWordTable {
    CompressedWordTable {
        data: entries(
            &[(0, 0), (11, 1)],
            &[
                "", "ก ข", "ก ข ค", "ก ข ฅ", "ก ฆ", "Bangkok", "Pathum Wan", "Lumphini",
                "Sathon", "Thung Maha Mek", "Nonthaburi", "", "ง Talat", "ง Rak", "Silom",
            ],
        ),
        lookup: Some("ฃ|Pak Kret".to_string()),
        words: Some("Khlong|Thom|Krabi|Nuea|Tai|Phon|Bang".to_string()),
    }
}

pub fn table(language: Language) -> CompressedWordTable {
    match language {
        Language::Thai => thai_table(),
        Language::English => english_table(),
    }
}

pub fn gazetteer() -> Vec<ProvinceNode> {
    vec![
        ProvinceNode(
            0,
            vec![DistrictNode(
                1,
                vec![
                    SubDistrictNode(2, 81120),
                    SubDistrictNode(3, 81120),
                    SubDistrictNode(4, 81170),
                ],
            )],
        ),
        ProvinceNode(
            5,
            vec![
                DistrictNode(6, vec![SubDistrictNode(7, 10330)]),
                DistrictNode(8, vec![SubDistrictNode(9, 10120)]),
                DistrictNode(13, vec![SubDistrictNode(14, 10500)]),
            ],
        ),
        ProvinceNode(
            10,
            vec![DistrictNode(
                11,
                vec![SubDistrictNode(11, 11120), SubDistrictNode(12, 11120)],
            )],
        ),
    ]
}

pub fn geo() -> Vec<GeoSlot> {
    [
        Some(81),
        Some(8101),
        None,
        Some(810102),
        Some(810103),
        Some(10),
        Some(1007),
        Some(100701),
        Some(1028),
        Some(102801),
        Some(1004),
        Some(100401),
        Some(12),
        Some(1206),
        Some(120601),
        Some(120602),
    ]
    .into_iter()
    .map(|slot| slot.map_or(GeoSlot::Flag(false), GeoSlot::Code))
    .collect()
}

pub fn generation(language: Language, geo_enabled: bool) -> Generation {
    let overlay = geo_enabled.then(geo);
    Generation::build(language, &table(language), &gazetteer(), overlay.as_deref())
        .expect("fixture data is valid")
}

/// Write the fixture as data files with the default names.
pub fn write_data_dir(dir: &Path) {
    let write = |name: &str, json: String| {
        std::fs::write(dir.join(name), json).expect("write fixture file");
    };
    write("db.json", serde_json::to_string(&gazetteer()).unwrap());
    write("th_db.json", serde_json::to_string(&thai_table()).unwrap());
    write("en_db.json", serde_json::to_string(&english_table()).unwrap());
    write("geo.json", serde_json::to_string(&geo()).unwrap());
}
