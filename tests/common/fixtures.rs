/// A small TEI dictionary with one clean entry and a few broken ones.
pub const SAMPLE_DICT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE TEI.2 SYSTEM "freedict-P5.dtd">
<TEI xmlns="http://www.tei-c.org/ns/1.0">
  <teiHeader><fileDesc><titleStmt><title>English-German FreeDict Dictionary</title></titleStmt></fileDesc></teiHeader>
  <text>
    <body>
      <entry>
        <form><orth>cat</orth><orth>kitty</orth><pron>kæt</pron></form>
        <gramGrp><pos>n</pos></gramGrp>
        <sense>
          <cit type="trans"><quote>Katze</quote><gramGrp><gen>f</gen></gramGrp></cit>
          <xr type="syn"><ref>puss</ref></xr>
        </sense>
      </entry>
      <entry>
        <form><orth>dog]</orth></form>
        <gramGrp><pos>n</pos></gramGrp>
        <sense><cit type="trans"><quote>Hund</quote></cit></sense>
      </entry>
      <entry>
        <form><orth>bird</orth></form>
        <gramGrp><pos>noun</pos></gramGrp>
        <sense><note>(small, flying</note><usg type="dom">bio</usg></sense>
      </entry>
      <entry>
        <form><orth>fish</orth></form>
        <sense><def>an animal {that swims}</def><usg type="reg">col</usg></sense>
      </entry>
    </body>
  </text>
</TEI>
"#;

/// Headwords of the entries in [`SAMPLE_DICT`], in document order.
pub const SAMPLE_HEADWORDS: [&str; 4] = ["cat, kitty", "dog]", "bird", "fish"];
