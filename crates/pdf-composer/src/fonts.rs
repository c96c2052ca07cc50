use lopdf::{Document, Object, ObjectId, Stream, dictionary};

/// FontDescriptor flag bits.
const FLAG_FIXED_PITCH: i64 = 1;
const FLAG_NONSYMBOLIC: i64 = 1 << 5;

/// Adds a simple Type1 font dictionary for one of the standard 14 fonts.
pub fn add_standard_font(doc: &mut Document, base_font: &str) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    })
}

/// A TrueType font program plus the metrics its PDF dictionaries need.
/// Metric values are in 1/1000 em.
#[derive(Debug, Clone, Copy)]
pub struct TrueTypeProgram<'a> {
    pub postscript_name: &'a str,
    pub data: &'a [u8],
    pub first_char: u8,
    /// One entry per code starting at `first_char`.
    pub widths: &'a [f32],
    pub bbox: [f32; 4],
    pub ascent: f32,
    pub descent: f32,
    pub cap_height: f32,
    pub fixed_pitch: bool,
}

/// Embeds a complete TrueType program (`/FontFile2`) as a WinAnsi simple font.
pub fn add_truetype_font(doc: &mut Document, program: &TrueTypeProgram<'_>) -> ObjectId {
    let base_font = sanitize_name(program.postscript_name);

    let file_id = doc.add_object(Stream::new(
        dictionary! { "Length1" => program.data.len() as i64 },
        program.data.to_vec(),
    ));

    let mut flags = FLAG_NONSYMBOLIC;
    if program.fixed_pitch {
        flags |= FLAG_FIXED_PITCH;
    }
    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => Object::Name(base_font.clone().into_bytes()),
        "Flags" => flags,
        "FontBBox" => program.bbox.iter().map(|v| Object::Integer(*v as i64)).collect::<Vec<_>>(),
        "ItalicAngle" => 0,
        "Ascent" => program.ascent as i64,
        "Descent" => program.descent as i64,
        "CapHeight" => program.cap_height as i64,
        "StemV" => 80,
        "FontFile2" => file_id,
    });

    let last_char = program.first_char as i64 + program.widths.len() as i64 - 1;
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "TrueType",
        "BaseFont" => Object::Name(base_font.into_bytes()),
        "FirstChar" => program.first_char as i64,
        "LastChar" => last_char,
        "Widths" => program.widths.iter().map(|w| Object::Integer(w.round() as i64)).collect::<Vec<_>>(),
        "FontDescriptor" => descriptor_id,
        "Encoding" => "WinAnsiEncoding",
    })
}

/// PDF name tokens cannot carry whitespace or delimiters.
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_graphic() && !"()<>[]{}/%#".contains(*c))
        .collect();
    if cleaned.is_empty() {
        "EmbeddedFont".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_font_dictionary() {
        let mut doc = Document::with_version("1.7");
        let id = add_standard_font(&mut doc, "Times-Roman");
        let dict = doc.get_dictionary(id).unwrap();
        assert_eq!(dict.get(b"Subtype").unwrap().as_name().unwrap(), b"Type1");
        assert_eq!(dict.get(b"BaseFont").unwrap().as_name().unwrap(), b"Times-Roman");
        assert_eq!(dict.get(b"Encoding").unwrap().as_name().unwrap(), b"WinAnsiEncoding");
    }

    #[test]
    fn test_truetype_font_objects() {
        let mut doc = Document::with_version("1.7");
        let widths = vec![250.0; 224];
        let program = TrueTypeProgram {
            postscript_name: "Inter Regular",
            data: &[0, 1, 0, 0, 9, 9],
            first_char: 32,
            widths: &widths,
            bbox: [-100.0, -200.0, 1000.0, 900.0],
            ascent: 969.0,
            descent: -242.0,
            cap_height: 727.0,
            fixed_pitch: false,
        };
        let id = add_truetype_font(&mut doc, &program);

        let font = doc.get_dictionary(id).unwrap();
        assert_eq!(font.get(b"Subtype").unwrap().as_name().unwrap(), b"TrueType");
        assert_eq!(font.get(b"BaseFont").unwrap().as_name().unwrap(), b"InterRegular");
        assert_eq!(font.get(b"LastChar").unwrap().as_i64().unwrap(), 255);
        assert_eq!(font.get(b"Widths").unwrap().as_array().unwrap().len(), 224);

        let descriptor_id = font.get(b"FontDescriptor").unwrap().as_reference().unwrap();
        let descriptor = doc.get_dictionary(descriptor_id).unwrap();
        assert_eq!(descriptor.get(b"Flags").unwrap().as_i64().unwrap(), 32);
        assert_eq!(descriptor.get(b"Descent").unwrap().as_i64().unwrap(), -242);

        let file_id = descriptor.get(b"FontFile2").unwrap().as_reference().unwrap();
        let file = doc.get_object(file_id).unwrap().as_stream().unwrap();
        assert_eq!(file.content, vec![0, 1, 0, 0, 9, 9]);
        assert_eq!(file.dict.get(b"Length1").unwrap().as_i64().unwrap(), 6);
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("Inter-Regular"), "Inter-Regular");
        assert_eq!(sanitize_name("My Font (1)"), "MyFont1");
        assert_eq!(sanitize_name("   "), "EmbeddedFont");
    }
}
