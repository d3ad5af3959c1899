//! Synthetic review pages shaped like the archived ones.

pub const NOT_FOUND_PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>Seite nicht gefunden - Rezensionen</title></head>
<body><div class="contentbox"><p>Die angeforderte Seite existiert nicht.</p></div></body></html>"#;

#[derive(Debug, Clone)]
pub struct PageSpec {
    pub heading: String,
    pub date_line: String,
    pub salutation: String,
    pub reviewer: String,
    pub description: String,
    pub reviewer_id: Option<String>,
    pub body: Vec<String>,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            heading: "<strong>Hans Meier:</strong> Soziale Arbeit heute. Votum Verlag (Münster) 2000. \
                      424 Seiten. ISBN 978-3-12345-678-9. 24,90 EUR."
                .into(),
            date_line: "Rezension vom 05.03.2010, Zugriff am 07.03.2010".into(),
            salutation: "Rezensentin".into(),
            reviewer: "Prof. Dr. Jane Doe".into(),
            description: "Professorin an der Hochschule in Köln, Fachbereich Sozialwesen".into(),
            reviewer_id: Some("4711".into()),
            body: vec![
                "Das Buch gibt einen Überblick über die Soziale Arbeit.".into(),
                "Es richtet sich an Studierende.".into(),
            ],
        }
    }
}

impl PageSpec {
    pub fn reviewer(mut self, salutation: &str, name: &str) -> Self {
        self.salutation = salutation.into();
        self.reviewer = name.into();
        self
    }

    pub fn date(mut self, date: &str) -> Self {
        self.date_line = format!("Rezension vom {date}");
        self
    }
}

pub fn review_page(spec: &PageSpec) -> String {
    let body: String = spec.body.iter().map(|p| format!("<p>{p}</p>\n")).collect();
    let reviewer_link = match &spec.reviewer_id {
        Some(id) => format!(
            r#"<a href="/rezensionen/rezensionen.php?id={id}">Alle 3 Rezensionen von {}</a>"#,
            spec.reviewer
        ),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html><head>
<title>Rezension: Soziale Arbeit heute</title>
<meta name="keywords" content="Soziale Arbeit;Jugend
Schule;_empfohlen">
<meta name="description" content="Rezension des Buches Soziale Arbeit heute">
</head><body>
<div class="contentbox">
<p>{heading}</p>
<p>{date_line}</p>
<h2>Thema</h2>
<p>Thema des Buches ist die Praxis.</p>
{body}<p>Besprochenes Werk kaufen bei <a href="https://shop.example/buch">Shop</a></p>
<h2>Fazit</h2>
<p><strong>{salutation}</strong><br>{reviewer}<br>{description}</p>
<p>{reviewer_link}</p>
<p>Zitiervorschlag</p>
<p><a href="http://portal.d-nb.de/opac.htm?query=9783123456789&amp;method=simpleSearch">DNB</a></p>
<p><a href="https://twitter.com/share">Teilen</a></p>
<p>Copyright</p>
<p>Impressum</p>
</div>
<div class="contentbox"><p>Newsletter</p></div>
<div class="contentbox"><a href="https://www.site.example/stellenmarkt/index.php?auswahl=Jugendhilfe">Stellen</a></div>
</body></html>"#,
        heading = spec.heading,
        date_line = spec.date_line,
        salutation = spec.salutation,
        reviewer = spec.reviewer,
        description = spec.description,
    )
}
