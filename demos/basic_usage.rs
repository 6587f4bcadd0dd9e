//! Basic usage example for thai-address.
//!
//! This example demonstrates the core functionality of the library:
//! - Browsing the province / district / sub-district hierarchy
//! - Searching records by name or postal code
//! - Splitting free-text addresses
//!
//! Run with: cargo run --example basic_usage
//!
//! Data files are read from `$THAI_ADDRESS_DATA_DIR` (or `data/thai-address`).

use thai_address::{Error, Language, ThaiAddress, ThaiAddressConfig};

#[tokio::main]
async fn main() -> Result<(), Error> {
    pretty_env_logger::init();

    println!("thai-address Basic Usage Example");
    println!("================================\n");

    let config = ThaiAddressConfig::builder()
        .language(Language::English)
        .build();
    let lookup = ThaiAddress::with_config(config).await?;
    println!(
        "Loaded {} records ({})\n",
        lookup.records().len(),
        lookup.generation().key()
    );

    // Example 1: Hierarchy
    println!("1. Hierarchy Lookup");
    println!("-------------------");
    let provinces = lookup.list_provinces();
    println!("{} provinces", provinces.len());
    for district in lookup.list_districts("Nonthaburi") {
        let subs = lookup.list_sub_districts(&district);
        println!("  {district}: {}", subs.join(", "));
    }
    println!();

    // Example 2: Search
    println!("2. Search");
    println!("---------");
    for record in lookup.search_by_sub_district("pak kret", Some(5)) {
        println!(
            "  {} / {} / {} {}",
            record.sub_district, record.district, record.province, record.postal_code
        );
    }
    println!(
        "  postal code 10330: {} records",
        lookup.search_by_postal_code(10330, None).len()
    );
    println!();

    // Example 3: Address splitting
    println!("3. Address Splitting");
    println!("--------------------");
    let address = "126/548 Road Name Pak Kret Pak Kret Nonthaburi Thailand 11120";
    println!("Input: {address}");
    match lookup.split_address(address) {
        Some(parts) => {
            println!("  Address:      {}", parts.address);
            println!("  Sub-district: {}", parts.sub_district);
            println!("  District:     {}", parts.district);
            println!("  Province:     {}", parts.province);
            println!("  Postal code:  {}", parts.postal_code);
        }
        None => println!("  No match"),
    }
    println!();

    // Example 4: Thai labels and geo codes
    println!("4. Thai Labels with Geo Codes");
    println!("-----------------------------");
    lookup.set_language(Language::Thai).await?;
    lookup.set_geo_enabled(true).await?;
    if let Some(parts) =
        lookup.split_address("126/548 ถ.สุขาประชาสรรค์ ต.ปากเกร็ด อ.ปากเกร็ด จ.นนทบุรี 11120")
    {
        println!("  {parts:?}");
    }
    for record in lookup.search_by_province("นนทบุรี", Some(2)) {
        println!(
            "  {} {:?} {:?}",
            record.sub_district, record.province_code, record.sub_district_code
        );
    }
    println!("  \"Pak Kret\" -> {}", lookup.translate_word("Pak Kret").await?);

    Ok(())
}
