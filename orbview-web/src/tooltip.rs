/// DOM tooltip overlay
use orbview_core::PresentationPayload;
use wasm_bindgen::prelude::*;
use web_sys::Element;

const BASE_STYLE: &str = "position:absolute;padding:5px;background-color:rgba(0,0,0,0.7);\
                          color:white;border-radius:5px;pointer-events:none;";

pub struct Tooltip {
    element: Element,
}

impl Tooltip {
    pub fn attach() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;

        let element = document.create_element("div")?;
        element.set_attribute("style", &format!("{}display:none;", BASE_STYLE))?;
        body.append_child(&element)?;
        Ok(Self { element })
    }

    pub fn show(&self, payload: &PresentationPayload) {
        self.element.set_inner_html(&payload_html(payload));
        let style = format!(
            "{}left:{}px;top:{}px;display:block;",
            BASE_STYLE, payload.anchor.x, payload.anchor.y
        );
        if let Err(e) = self.element.set_attribute("style", &style) {
            web_sys::console::error_1(&e);
        }
    }

    pub fn hide(&self) {
        let style = format!("{}display:none;", BASE_STYLE);
        if let Err(e) = self.element.set_attribute("style", &style) {
            web_sys::console::error_1(&e);
        }
    }
}

impl Drop for Tooltip {
    fn drop(&mut self) {
        self.element.remove();
    }
}

/// Lines joined with `<br>`, body names escaped
pub fn payload_html(payload: &PresentationPayload) -> String {
    payload
        .lines
        .iter()
        .map(|line| escape_html(line))
        .collect::<Vec<_>>()
        .join("<br>")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbview_core::ScreenPoint;

    #[test]
    fn test_payload_html_escapes_names() {
        let payload = PresentationPayload {
            lines: vec![
                "Name: <b>Rock & Roll</b>".to_string(),
                "Latitude: 1.00".to_string(),
            ],
            anchor: ScreenPoint::new(0.0, 0.0),
        };
        assert_eq!(
            payload_html(&payload),
            "Name: &lt;b&gt;Rock &amp; Roll&lt;/b&gt;<br>Latitude: 1.00"
        );
    }
}
