use crate::rewrite::{Platform, SourceArticle};

/// Build the rewrite instructions for one platform.
pub fn build_prompt(platform: Platform, source: &SourceArticle<'_>, brand: &str) -> String {
    let instructions = match platform {
        Platform::Medium => medium_instructions(source.url, brand),
        Platform::DevTo => devto_instructions(source.url, brand),
    };

    let mut prompt = instructions;
    prompt.push_str("\nArtículo original:\n");
    prompt.push_str(&format!("Título original: {}\n", source.title));
    if !source.excerpt.trim().is_empty() {
        prompt.push_str(&format!("Resumen: {}\n", source.excerpt.trim()));
    }
    prompt.push('\n');
    prompt.push_str(source.content.trim());
    prompt.push('\n');
    prompt
}

fn medium_instructions(url: &str, brand: &str) -> String {
    format!(
        r#"Eres un redactor de tecnología con experiencia en SEO editorial que escribe para Medium.
Reescribe el artículo de abajo con un enfoque propio, profesional y humano.

Requisitos:
1. Propón un título nuevo y atractivo, claramente distinto del original.
2. Escribe con la voz natural de un desarrollador web, sin que suene automatizado.
3. Cita como máximo dos fuentes externas de alta autoridad (Wired, TechCrunch, Hacker News, MIT Technology Review u otras de prestigio) con enlaces HTML reales y textos de anclaje descriptivos y variados; nunca "aquí" ni "artículo".
4. Menciona el artículo de origen como referencia adicional con <a href="{url}">este enlace</a>, usando un texto de anclaje largo y descriptivo.
5. No abras el texto con la fuente original; úsala en el cuerpo o al final.
6. Termina con un párrafo de reflexión genuina o una recomendación técnica.

Reglas:
- No más de dos fuentes externas.
- Los enlaces van siempre en HTML.
- No nombres a {brand}; nada de frases como "según {brand}".

Formato de salida:

Título: [título nuevo]
[artículo reescrito]
"#
    )
}

fn devto_instructions(url: &str, brand: &str) -> String {
    format!(
        r#"Eres un redactor de tecnología para publicaciones profesionales como Dev.to y GitHub.
Reflexiona sobre el tema principal del artículo de abajo siguiendo estas pautas:

Requisitos:
1. Propón un título completamente nuevo, creativo y atractivo, distinto del original.
2. Usa un estilo editorial, técnico y humano, pensado para lectores avanzados del sector.
3. Añade como máximo dos enlaces externos útiles en HTML (Wired, TechCrunch, MIT Technology Review u otras de prestigio) con textos de anclaje largos, naturales y variados.
4. Incluye una referencia al artículo de origen con <a href="{url}">este enlace</a> y un texto de anclaje natural; nunca "aquí".
5. No nombres a {brand}; trata la fuente como un referente más, sin frases como "según {brand}".
6. Cierra con una conclusión convincente.

Formato de salida:

Título: [título nuevo]
[artículo reescrito en markdown, enlaces en HTML]
"#
    )
}
