use lopdf::Object;
use lopdf::StringFormat;
use lopdf::content::Operation;
use overstamp_layout::encode_win_ansi;
use overstamp_types::Color;

fn unit(channel: u8) -> Object {
    (channel as f32 / 255.0).into()
}

/// `BT /font size Tf r g b rg x y Td (text) Tj ET`
pub(crate) fn text_operations(
    font_name: &str,
    size: f32,
    color: Color,
    x: f32,
    y: f32,
    text: &str,
) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![Object::Name(font_name.as_bytes().to_vec()), size.into()]),
        Operation::new("rg", vec![unit(color.r), unit(color.g), unit(color.b)]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
    ]
}

/// Paints the unit square of image `name` over the given rectangle.
pub(crate) fn image_operations(name: &str, x: f32, y: f32, width: f32, height: f32) -> Vec<Operation> {
    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![width.into(), 0.into(), 0.into(), height.into(), x.into(), y.into()],
        ),
        Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::Content;

    #[test]
    fn test_text_operations_encode_win_ansi() {
        let ops = text_operations("OvF1", 12.0, Color::rgb(255, 0, 0), 10.0, 20.0, "café");
        let operators: Vec<&str> = ops.iter().map(|o| o.operator.as_str()).collect();
        assert_eq!(operators, vec!["BT", "Tf", "rg", "Td", "Tj", "ET"]);
        match &ops[4].operands[0] {
            Object::String(bytes, _) => assert_eq!(bytes, &vec![b'c', b'a', b'f', 0xE9]),
            other => panic!("unexpected operand {:?}", other),
        }
    }

    #[test]
    fn test_image_operations_are_isolated() {
        let content = Content {
            operations: image_operations("OvIm1", 1.0, 2.0, 30.0, 40.0),
        };
        let encoded = String::from_utf8(content.encode().unwrap()).unwrap();
        assert!(encoded.starts_with("q\n"));
        assert!(encoded.contains(" cm"));
        assert!(encoded.contains("/OvIm1 Do"));
        assert!(encoded.trim_end().ends_with('Q'));
    }
}
