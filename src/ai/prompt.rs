//! Prompt Construction
//!
//! Deterministic system+user message pairs for the three task types:
//! literary analysis, whole-text style correction with inline justifications,
//! and single-paragraph correction for the batch variant.
//!
//! Builders perform no validation and never truncate or re-encode the input
//! text; bounds checking is the pipeline's responsibility.

use crate::types::{Genre, Language};

/// A system+user message pair ready for one completion call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
}

const ANALYSIS_SYSTEM: &str = "\
Eres un crítico literario experto que proporciona análisis detallados y recomendaciones de estilo \
basadas en el género y la audiencia especificados.
**No debes corregir, modificar ni repetir el texto proporcionado.**
Tu única tarea es analizar el texto y ofrecer sugerencias de mejora enfocadas en aspectos \
literarios específicos como temas, desarrollo de personajes, estructura narrativa, tono y estilo.
Organiza el análisis en secciones claras como **Temas**, **Desarrollo de Personajes**, \
**Estructura Narrativa**, **Estilo y Tono**.
Preserva todos los hipervínculos existentes en el texto. No agregues nuevos hipervínculos y no \
alteres las URLs de los hipervínculos existentes.";

const CORRECTION_SYSTEM: &str = "\
Eres un editor experto en corrección de estilo, ortografía, gramática y puntuación que revisa \
textos literarios.
**No debes realizar cambios que alteren el contenido original del autor.**
Tu tarea es corregir el estilo, ortografía, gramática y puntuación del texto proporcionado basado \
en el análisis y las recomendaciones previas.
**Preserva todos los hipervínculos existentes en el texto. No agregues nuevos hipervínculos. No \
alteres las URLs de los hipervínculos existentes.**
**Después de cada cambio realizado, añade una justificación entre corchetes y en color rojo.**";

const PARAGRAPH_SYSTEM: &str = "\
Eres un asistente útil que corrige errores de ortografía y estilo en un texto, sin cambiar las \
citas textuales (el texto entre comillas) y preservando las notas a pie de página (indicadas como \
números entre corchetes, por ejemplo, [1]). Mantén las notas a pie de página en los mismos \
lugares del texto, incluso si las oraciones cambian.";

/// Build the literary analysis prompt.
///
/// Genre, audience, language, and text are interpolated verbatim into the
/// fixed template.
pub fn build_analysis_prompt(
    genre: Genre,
    audience: &str,
    language: Language,
    text: &str,
) -> ChatPrompt {
    let user = format!(
        "Por favor, analiza el siguiente texto y proporciona una crítica literaria junto con \
         recomendaciones de estilo específicas.\n\n\
         **Instrucciones adicionales:**\n\
         - No corrijas ni modifiques el texto original de ninguna manera.\n\
         - Enfócate únicamente en proporcionar observaciones, críticas constructivas y \
         sugerencias de mejora relacionadas directamente con el contenido del texto.\n\n\
         **Género:** {}\n\
         **Audiencia:** {}\n\
         **Idioma:** {}\n\n\
         **Texto:**\n{}",
        genre.as_str(),
        audience,
        language.name(),
        text
    );

    ChatPrompt {
        system: ANALYSIS_SYSTEM.to_string(),
        user,
    }
}

/// Build the correction prompt from a prior analysis and the original text.
pub fn build_correction_prompt(analysis: &str, text: &str) -> ChatPrompt {
    let user = format!(
        "Basado en el siguiente análisis y recomendaciones, realiza una corrección de estilo del \
         texto proporcionado. Incluye también correcciones ortográficas, gramaticales y de \
         puntuación. Después de cada cambio realizado, añade una justificación entre corchetes.\n\n\
         **Análisis y Recomendaciones:**\n{}\n\n\
         **Texto Original:**\n{}\n\n\
         **Instrucciones adicionales:**\n\
         - No modifiques el contenido del texto; enfócate únicamente en mejorar la claridad, el \
         flujo, el estilo, la ortografía, la gramática y la puntuación.\n\
         - Preserva todos los hipervínculos existentes y no alteres sus URLs.\n\
         - Para cada cambio realizado, proporciona una justificación detallada entre corchetes.\n\
         - Presenta el texto corregido con las justificaciones inline.",
        analysis, text
    );

    ChatPrompt {
        system: CORRECTION_SYSTEM.to_string(),
        user,
    }
}

/// Build the single-paragraph correction prompt for the batch variant.
pub fn build_paragraph_prompt(paragraph: &str) -> ChatPrompt {
    ChatPrompt {
        system: PARAGRAPH_SYSTEM.to_string(),
        user: format!("Aquí está el párrafo:\n\n{}", paragraph),
    }
}
