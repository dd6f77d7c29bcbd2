// --- File: crates/dialbridge_twilio/src/twiml.rs ---
//! Emitters for the two TwiML documents this gateway produces: voice
//! call-routing responses and SMS auto-replies. Only the verbs the gateway
//! uses are modeled; attribute and text content is XML-escaped.

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Where a `<Dial>` connects the call: a raw phone number or a named client
/// endpoint registered through the browser SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialTarget {
    Number(String),
    Client(String),
}

/// A `<Dial>` verb under construction.
#[derive(Debug, Clone, Default)]
pub struct Dial {
    caller_id: Option<String>,
    target: Option<DialTarget>,
}

impl Dial {
    pub fn new() -> Self {
        Dial::default()
    }

    /// Number shown to the called party.
    pub fn caller_id(mut self, value: impl Into<String>) -> Self {
        self.caller_id = Some(value.into());
        self
    }

    pub fn number(mut self, value: impl Into<String>) -> Self {
        self.target = Some(DialTarget::Number(value.into()));
        self
    }

    pub fn client(mut self, value: impl Into<String>) -> Self {
        self.target = Some(DialTarget::Client(value.into()));
        self
    }

    fn write_xml(&self, xml: &mut String) {
        match &self.caller_id {
            Some(caller_id) => {
                xml.push_str(&format!(r#"<Dial callerId="{}">"#, escape(caller_id)))
            }
            None => xml.push_str("<Dial>"),
        }
        match &self.target {
            Some(DialTarget::Number(number)) => {
                xml.push_str(&format!("<Number>{}</Number>", escape(number)))
            }
            Some(DialTarget::Client(client)) => {
                xml.push_str(&format!("<Client>{}</Client>", escape(client)))
            }
            None => {}
        }
        xml.push_str("</Dial>");
    }
}

#[derive(Debug, Clone)]
enum VoiceVerb {
    Dial(Dial),
    Say(String),
}

/// A voice `<Response>` document.
#[derive(Debug, Clone, Default)]
pub struct VoiceResponse {
    verbs: Vec<VoiceVerb>,
}

impl VoiceResponse {
    pub fn new() -> Self {
        VoiceResponse::default()
    }

    pub fn dial(mut self, dial: Dial) -> Self {
        self.verbs.push(VoiceVerb::Dial(dial));
        self
    }

    pub fn say(mut self, text: impl Into<String>) -> Self {
        self.verbs.push(VoiceVerb::Say(text.into()));
        self
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::from(XML_DECLARATION);
        xml.push_str("<Response>");
        for verb in &self.verbs {
            match verb {
                VoiceVerb::Dial(dial) => dial.write_xml(&mut xml),
                VoiceVerb::Say(text) => {
                    xml.push_str(&format!("<Say>{}</Say>", escape(text)))
                }
            }
        }
        xml.push_str("</Response>");
        xml
    }
}

/// A messaging `<Response>` document.
#[derive(Debug, Clone, Default)]
pub struct MessagingResponse {
    messages: Vec<String>,
}

impl MessagingResponse {
    pub fn new() -> Self {
        MessagingResponse::default()
    }

    pub fn message(mut self, body: impl Into<String>) -> Self {
        self.messages.push(body.into());
        self
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::from(XML_DECLARATION);
        xml.push_str("<Response>");
        for body in &self.messages {
            xml.push_str(&format!("<Message>{}</Message>", escape(body)));
        }
        xml.push_str("</Response>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dial_number_with_caller_id() {
        let xml = VoiceResponse::new()
            .dial(Dial::new().caller_id("+15550001111").number("+15551234567"))
            .to_xml();
        assert_eq!(
            xml,
            r#"<?xml version="1.0" encoding="UTF-8"?><Response><Dial callerId="+15550001111"><Number>+15551234567</Number></Dial></Response>"#
        );
    }

    #[test]
    fn dial_client_without_caller_id() {
        let xml = VoiceResponse::new()
            .dial(Dial::new().client("front_desk"))
            .to_xml();
        assert!(xml.contains("<Dial><Client>front_desk</Client></Dial>"));
    }

    #[test]
    fn say_and_message_bodies_are_escaped() {
        let voice = VoiceResponse::new().say("Press <1> & wait").to_xml();
        assert!(voice.contains("<Say>Press &lt;1&gt; &amp; wait</Say>"));

        let sms = MessagingResponse::new().message(r#"Use "quotes""#).to_xml();
        assert!(sms.contains("<Message>Use &quot;quotes&quot;</Message>"));
    }

    #[test]
    fn caller_id_attribute_is_escaped() {
        let xml = VoiceResponse::new()
            .dial(Dial::new().caller_id(r#"+1"555""#).number("+15551234567"))
            .to_xml();
        assert!(xml.contains(r#"callerId="+1&quot;555&quot;""#));
    }
}
