//! Fixed set of subject responders and their per-subject text

use crate::error::Error;
use crate::tools::{CALCULATOR_TOOL, SYLLABUS_SEARCH_TOOL};
use crate::types::AgentDescriptor;

/// Subject a responder specializes in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    Math,
    Physics,
    /// Grounding-dedicated responder used for on-syllabus requests
    GeneralSyllabus,
}

/// Persona and instruction lines for one prompt style
#[derive(Debug, Clone, Copy)]
pub struct PromptStyle {
    pub persona: &'static str,
    pub instructions: &'static [&'static str],
}

/// Routing identity of the orchestrator
pub const ROUTER_NAME: &str = "Tutor Agent";
pub const ROUTER_DESCRIPTION: &str =
    "Main orchestrator that intelligently routes questions to specialized tools";

/// Off-syllabus style shared by the general responder and the router
pub const GENERAL_TUTORING: PromptStyle = PromptStyle {
    persona: "You are a knowledgeable and helpful tutor. Answer this question clearly and educationally.",
    instructions: &[
        "Provide comprehensive but accessible explanations",
        "Break down complex topics into understandable parts",
        "Use examples to illustrate concepts when helpful",
        "Encourage learning and curiosity",
        "If the question spans multiple subjects, address each aspect appropriately",
        "Make your explanation suitable for a student seeking to learn",
    ],
};

impl Subject {
    /// Specialists polled by the router, in poll order
    pub const SPECIALISTS: [Subject; 2] = [Subject::Math, Subject::Physics];

    /// Name reported as `agent_used`
    pub fn name(&self) -> &'static str {
        match self {
            Subject::Math => "Math Agent",
            Subject::Physics => "Physics Agent",
            Subject::GeneralSyllabus => "Syllabus Agent",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Subject::Math => {
                "Handles mathematical questions, equations, calculations, algebra, geometry, calculus, and all mathematical concepts"
            }
            Subject::Physics => {
                "Handles physics questions, problems, concepts, and scientific principles related to mechanics, thermodynamics, electromagnetism, and quantum physics"
            }
            Subject::GeneralSyllabus => {
                "Specialized agent for answering questions using only syllabus materials and course content"
            }
        }
    }

    pub fn tools(&self) -> &'static [&'static str] {
        match self {
            Subject::Math | Subject::Physics => &[CALCULATOR_TOOL],
            Subject::GeneralSyllabus => &[CALCULATOR_TOOL, SYLLABUS_SEARCH_TOOL],
        }
    }

    /// Descriptor built from the fixed identity
    pub fn descriptor(&self) -> AgentDescriptor {
        AgentDescriptor::new(self.name(), self.description(), self.tools())
    }

    /// Subject label and criteria for the YES/NO classification prompt.
    /// `None` means the responder accepts every question.
    pub fn classification(&self) -> Option<(&'static str, &'static [&'static str])> {
        match self {
            Subject::Math => Some((
                "mathematics",
                &[
                    "Arithmetic calculations, algebra, geometry, trigonometry, calculus",
                    "Mathematical concepts, formulas, equations, proofs",
                    "Statistical problems, probability questions",
                    "Mathematical word problems",
                    "Questions about mathematical theories or methods",
                ],
            )),
            Subject::Physics => Some((
                "physics",
                &[
                    "Mechanics (motion, forces, energy, momentum)",
                    "Thermodynamics (heat, temperature, entropy)",
                    "Electromagnetism (electricity, magnetism, waves)",
                    "Quantum physics and atomic structure",
                    "Optics, acoustics, fluid dynamics",
                    "Physics concepts, laws, theories, or principles",
                    "Physics problem-solving with calculations",
                ],
            )),
            Subject::GeneralSyllabus => None,
        }
    }

    /// Substrings that mark a question as in-domain when classification fails
    pub fn keyword_indicators(&self) -> &'static [&'static str] {
        match self {
            Subject::Math => &[
                "calculate", "solve", "equation", "math", "formula", "derivative", "integral", "+",
                "-", "*", "/", "=",
            ],
            Subject::Physics => &[
                "physics",
                "force",
                "energy",
                "velocity",
                "acceleration",
                "newton",
                "gravity",
                "mass",
                "momentum",
                "wave",
                "quantum",
            ],
            Subject::GeneralSyllabus => &[],
        }
    }

    /// Keyword fallback for the capability check
    pub fn matches_keywords(&self, question: &str) -> bool {
        if self.classification().is_none() {
            return true;
        }
        let question = question.to_lowercase();
        self.keyword_indicators()
            .iter()
            .any(|indicator| question.contains(indicator))
    }

    /// Style for answers restricted to syllabus materials
    pub fn grounded_style(&self) -> PromptStyle {
        match self {
            Subject::Math => PromptStyle {
                persona: "You are a mathematics tutor.",
                instructions: &[
                    "Provide step-by-step solutions when the materials show examples",
                    "Reference specific sections or examples from the materials",
                    "Use proper mathematical notation as shown in the materials",
                ],
            },
            Subject::Physics => PromptStyle {
                persona: "You are a physics tutor.",
                instructions: &[
                    "Reference specific laws, principles, or examples from the materials",
                    "Show step-by-step problem solving as demonstrated in the materials",
                    "Use proper scientific units as shown in the materials",
                ],
            },
            Subject::GeneralSyllabus => PromptStyle {
                persona: "You are a knowledgeable tutor.",
                instructions: &[
                    "Break down complex topics as explained in the materials",
                    "Reference specific sections or examples from the materials",
                    "Make your explanation suitable for a student following the syllabus",
                ],
            },
        }
    }

    /// Style for general-knowledge answers
    pub fn tutoring_style(&self) -> PromptStyle {
        match self {
            Subject::Math => PromptStyle {
                persona: "You are an expert mathematics tutor. Answer this question with clear, educational explanations.",
                instructions: &[
                    "Provide step-by-step solutions when applicable",
                    "Explain mathematical concepts clearly",
                    "Use proper mathematical notation",
                    "Make explanations suitable for students",
                    "If solving equations, show each step",
                    "Include relevant formulas when helpful",
                ],
            },
            Subject::Physics => PromptStyle {
                persona: "You are an expert physics tutor. Answer this question with clear, scientific explanations.",
                instructions: &[
                    "Explain relevant physics principles and laws",
                    "Show step-by-step problem solving when applicable",
                    "Include relevant formulas and their meanings",
                    "Use proper scientific units",
                    "Connect concepts to real-world applications",
                    "Make explanations accessible to students",
                    "If solving physics problems, clearly show the approach",
                ],
            },
            Subject::GeneralSyllabus => GENERAL_TUTORING,
        }
    }

    /// Answer returned when grounding finds nothing
    pub fn not_found_message(&self) -> &'static str {
        match self {
            Subject::Math => {
                "I couldn't find any relevant mathematical content in the syllabus materials to answer your question. Please check if the topic is covered in your course materials."
            }
            Subject::Physics => {
                "I couldn't find any relevant physics content in the syllabus materials to answer your question. Please check if the topic is covered in your course materials."
            }
            Subject::GeneralSyllabus => NOT_FOUND_GENERAL,
        }
    }

    /// Answer returned when the generation call fails
    pub fn failure_message(&self, error: &Error) -> String {
        match self {
            Subject::Math => format!("I encountered an error processing your math question: {}", error),
            Subject::Physics => {
                format!("I encountered an error processing your physics question: {}", error)
            }
            Subject::GeneralSyllabus => general_failure_message(error),
        }
    }
}

/// Not-found answer of the general responder
pub const NOT_FOUND_GENERAL: &str = "I couldn't find any relevant content in the syllabus materials to answer your question. Please check if the topic is covered in your course materials or try the off-syllabus mode for general knowledge.";

/// Failure answer without a subject
pub fn general_failure_message(error: &Error) -> String {
    format!("I encountered an error processing your question: {}", error)
}
