//! Fixture PDFs assembled with lopdf for unit tests.

use std::io::Write;

use lopdf::{Object, Stream, dictionary};

/// Minimal single-page PDF with the given content stream.
pub(crate) fn pdf_with_content(content: &[u8]) -> Vec<u8> {
    pdf_with_pages(&[content])
}

/// Minimal PDF with one page per content stream.
pub(crate) fn pdf_with_pages(contents: &[&[u8]]) -> Vec<u8> {
    build_pdf(contents, &[])
}

/// PDF where the pages at `broken` (0-based) have a /Contents reference
/// pointing at a nonexistent object, so content extraction faults.
pub(crate) fn pdf_with_broken_pages(contents: &[&[u8]], broken: &[usize]) -> Vec<u8> {
    build_pdf(contents, broken)
}

fn build_pdf(contents: &[&[u8]], broken: &[usize]) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ];

    let mut page_ids = Vec::new();
    for (i, content) in contents.iter().enumerate() {
        let content_ref = if broken.contains(&i) {
            // Dangling reference: object (9000+i, 0) is never added
            Object::Reference((9000 + i as u32, 0))
        } else {
            let stream = Stream::new(dictionary! {}, content.to_vec());
            Object::Reference(doc.add_object(stream))
        };
        let resources = dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference(font_id) },
        };
        let page_dict = dictionary! {
            "Type" => "Page",
            "MediaBox" => media_box.clone(),
            "Contents" => content_ref,
            "Resources" => resources,
        };
        page_ids.push(doc.add_object(page_dict));
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(page_ids.len() as i64),
    };
    let pages_id = doc.add_object(pages_dict);

    for pid in &page_ids {
        if let Ok(page_obj) = doc.get_object_mut(*pid) {
            if let Ok(dict) = page_obj.as_dict_mut() {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Content stream drawing `rows` as a grid: columns at x = 72, 172, 272...
/// and rows starting at y = 720 descending 20pt per row. Empty cells draw
/// nothing.
pub(crate) fn table_content(rows: &[&[&str]]) -> Vec<u8> {
    let mut content = String::new();
    for (r, cells) in rows.iter().enumerate() {
        let y = 720.0 - r as f64 * 20.0;
        for (c, text) in cells.iter().enumerate() {
            if text.is_empty() {
                continue;
            }
            let x = 72.0 + c as f64 * 100.0;
            content.push_str(&format!("BT /F1 10 Tf {x} {y} Td ({text}) Tj ET\n"));
        }
    }
    content.into_bytes()
}

/// Write bytes to a temp file with a .pdf suffix.
pub(crate) fn write_temp_pdf(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}
