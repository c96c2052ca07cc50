use lopdf::content::Content;
use lopdf::{Document, Object};

/// A `Tj` shown on a page together with the text state it was shown in.
#[derive(Debug, Clone, PartialEq)]
pub struct ShownText {
    pub text: String,
    pub font: String,
    pub size: f32,
    pub x: f32,
    pub y: f32,
}

/// An image XObject painted through a `cm` + `Do` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintedImage {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

fn number(object: &Object) -> f32 {
    match object {
        Object::Integer(i) => *i as f32,
        Object::Real(r) => *r,
        other => panic!("expected a number, got {:?}", other),
    }
}

fn name(object: &Object) -> String {
    String::from_utf8_lossy(object.as_name().unwrap()).into_owned()
}

/// WinAnsi bytes back to text, for the Latin-1 subset the tests use.
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|b| *b as char).collect()
}

pub fn page_operations(doc: &Document, page: u32) -> Content {
    let page_id = *doc.get_pages().get(&page).unwrap();
    let bytes = doc.get_page_content(page_id).unwrap();
    Content::decode(&bytes).unwrap()
}

/// Every string shown on `page`, in content order. Only `Td` positioning is
/// tracked, which is all the documents under test use.
pub fn shown_text(doc: &Document, page: u32) -> Vec<ShownText> {
    let mut shown = Vec::new();
    let (mut font, mut size, mut x, mut y) = (String::new(), 0.0, 0.0, 0.0);
    for op in page_operations(doc, page).operations {
        match op.operator.as_str() {
            "BT" => {
                x = 0.0;
                y = 0.0;
            }
            "Tf" => {
                font = name(&op.operands[0]);
                size = number(&op.operands[1]);
            }
            "Td" => {
                x += number(&op.operands[0]);
                y += number(&op.operands[1]);
            }
            "Tj" => {
                if let Object::String(bytes, _) = &op.operands[0] {
                    shown.push(ShownText {
                        text: latin1(bytes),
                        font: font.clone(),
                        size,
                        x,
                        y,
                    });
                }
            }
            _ => {}
        }
    }
    shown
}

pub fn shown(doc: &Document, page: u32, text: &str) -> ShownText {
    shown_text(doc, page)
        .into_iter()
        .find(|s| s.text == text)
        .unwrap_or_else(|| panic!("'{}' is not shown on page {}", text, page))
}

pub fn painted_images(doc: &Document, page: u32) -> Vec<PaintedImage> {
    let mut painted = Vec::new();
    let mut matrix = [0.0f32; 6];
    for op in page_operations(doc, page).operations {
        match op.operator.as_str() {
            "cm" => {
                for (slot, operand) in matrix.iter_mut().zip(&op.operands) {
                    *slot = number(operand);
                }
            }
            "Do" => painted.push(PaintedImage {
                name: name(&op.operands[0]),
                x: matrix[4],
                y: matrix[5],
                width: matrix[0],
                height: matrix[3],
            }),
            _ => {}
        }
    }
    painted
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap(),
        other => other,
    }
}

/// `/BaseFont` of the font registered as `resource_name` on `page`. The
/// exported pages carry their own `/Resources`.
pub fn base_font(doc: &Document, page: u32, resource_name: &str) -> String {
    let page_id = *doc.get_pages().get(&page).unwrap();
    let page_dict = doc.get_dictionary(page_id).unwrap();
    let resources = resolve(doc, page_dict.get(b"Resources").unwrap())
        .as_dict()
        .unwrap();
    let fonts = resolve(doc, resources.get(b"Font").unwrap()).as_dict().unwrap();
    let font = fonts
        .get(resource_name.as_bytes())
        .unwrap_or_else(|_| panic!("no font /{} on page {}", resource_name, page));
    name(resolve(doc, font).as_dict().unwrap().get(b"BaseFont").unwrap())
}

/// The image XObject registered as `resource_name` on `page`.
pub fn image_object<'a>(doc: &'a Document, page: u32, resource_name: &str) -> &'a lopdf::Stream {
    let page_id = *doc.get_pages().get(&page).unwrap();
    let page_dict = doc.get_dictionary(page_id).unwrap();
    let resources = resolve(doc, page_dict.get(b"Resources").unwrap())
        .as_dict()
        .unwrap();
    let xobjects = resolve(doc, resources.get(b"XObject").unwrap())
        .as_dict()
        .unwrap();
    resolve(doc, xobjects.get(resource_name.as_bytes()).unwrap())
        .as_stream()
        .unwrap()
}

/// Balanced `q`/`Q` across the whole page content.
pub fn assert_graphics_state_balanced(doc: &Document, page: u32) {
    let mut depth = 0i32;
    for op in page_operations(doc, page).operations {
        match op.operator.as_str() {
            "q" => depth += 1,
            "Q" => depth -= 1,
            _ => {}
        }
        assert!(depth >= 0, "Q without matching q on page {}", page);
    }
    assert_eq!(depth, 0, "unbalanced q/Q on page {}", page);
}
